use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};

pub const DEFAULT_OUTPUT_FILE: &str = "consolidated_customers.csv";
pub const DEFAULT_ARCHIVE_DIR: &str = "procesados";

#[derive(Parser, Debug)]
#[command(
    name = "leadmerge",
    version,
    about = "Consolidate customer/lead CSV exports into one deduplicated dataset"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Consolidate(ConsolidateArgs),
    Status(StatusArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ConsolidateArgs {
    #[arg(long, default_value = ".")]
    pub input_dir: PathBuf,

    #[arg(long, default_value = DEFAULT_OUTPUT_FILE)]
    pub output_file: String,

    #[arg(long)]
    pub archive_dir: Option<PathBuf>,

    #[arg(long)]
    pub manifest_path: Option<PathBuf>,

    #[arg(long, default_value_t = false)]
    pub dry_run: bool,
}

impl ConsolidateArgs {
    pub fn output_path(&self) -> PathBuf {
        self.input_dir.join(&self.output_file)
    }

    pub fn resolved_archive_dir(&self) -> PathBuf {
        resolve_archive_dir(&self.input_dir, self.archive_dir.as_deref())
    }
}

#[derive(Args, Debug, Clone)]
pub struct StatusArgs {
    #[arg(long, default_value = ".")]
    pub input_dir: PathBuf,

    #[arg(long, default_value = DEFAULT_OUTPUT_FILE)]
    pub output_file: String,

    #[arg(long)]
    pub archive_dir: Option<PathBuf>,
}

impl StatusArgs {
    pub fn output_path(&self) -> PathBuf {
        self.input_dir.join(&self.output_file)
    }

    pub fn resolved_archive_dir(&self) -> PathBuf {
        resolve_archive_dir(&self.input_dir, self.archive_dir.as_deref())
    }
}

fn resolve_archive_dir(input_dir: &Path, archive_dir: Option<&Path>) -> PathBuf {
    archive_dir
        .map(Path::to_path_buf)
        .unwrap_or_else(|| input_dir.join(DEFAULT_ARCHIVE_DIR))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consolidate_defaults_match_fixed_layout() {
        let cli = Cli::parse_from(["leadmerge", "consolidate"]);
        let Commands::Consolidate(args) = cli.command else {
            panic!("expected consolidate command");
        };

        assert_eq!(args.output_path(), PathBuf::from("./consolidated_customers.csv"));
        assert_eq!(args.resolved_archive_dir(), PathBuf::from("./procesados"));
        assert!(!args.dry_run);
    }

    #[test]
    fn explicit_archive_dir_overrides_default() {
        let cli = Cli::parse_from([
            "leadmerge",
            "status",
            "--input-dir",
            "/data/leads",
            "--archive-dir",
            "/data/archive",
        ]);
        let Commands::Status(args) = cli.command else {
            panic!("expected status command");
        };

        assert_eq!(args.resolved_archive_dir(), PathBuf::from("/data/archive"));
        assert_eq!(
            args.output_path(),
            PathBuf::from("/data/leads/consolidated_customers.csv")
        );
    }
}
