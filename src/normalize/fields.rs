use anyhow::{Context, Result};
use regex::Regex;

use super::{EMAIL_COLUMN, NAME_COLUMN, PHONE_COLUMN};
use crate::table::Table;

#[derive(Debug)]
pub struct FieldNormalizer {
    phone_marker: Regex,
    phone_noise: Regex,
}

impl FieldNormalizer {
    pub fn new() -> Result<Self> {
        Ok(Self {
            phone_marker: Regex::new(r"^p:").context("failed to compile phone marker regex")?,
            phone_noise: Regex::new(r"[^\d+]").context("failed to compile phone noise regex")?,
        })
    }

    pub fn phone(&self, raw: &str) -> String {
        let unmarked = self.phone_marker.replace(raw, "");
        self.phone_noise.replace_all(&unmarked, "").into_owned()
    }

    pub fn email(&self, raw: &str) -> String {
        raw.to_lowercase()
    }

    pub fn name(&self, raw: &str) -> String {
        raw.to_lowercase()
    }

    pub fn apply(&self, table: &mut Table) {
        table.map_column(PHONE_COLUMN, |value| self.phone(value));
        table.map_column(EMAIL_COLUMN, |value| self.email(value));
        table.map_column(NAME_COLUMN, |value| self.name(value));
    }
}
