use std::collections::HashMap;

use anyhow::{Context, Result};
use regex::Regex;

use crate::table::Table;

const CHARACTER_REPLACEMENTS: &[(char, &str)] = &[
    ('á', "a"),
    ('é', "e"),
    ('í', "i"),
    ('ó', "o"),
    ('ú', "u"),
    ('Á', "A"),
    ('É', "E"),
    ('Í', "I"),
    ('Ó', "O"),
    ('Ú', "U"),
    ('ñ', "n"),
    ('Ñ', "N"),
    ('¿', ""),
    ('?', ""),
    ('¡', ""),
    ('!', ""),
    ('_', " "),
];

const COLUMN_SYNONYMS: &[(&str, &str)] = &[
    ("telefono", "phone_number"),
    ("phone", "phone_number"),
    ("celular", "phone_number"),
    ("cel", "phone_number"),
    ("phone_number", "phone_number"),
    ("nombre", "name"),
    ("nombres", "name"),
    ("full_name", "name"),
    ("apellido", "last_name"),
    ("apellidos", "last_name"),
    ("email", "email"),
    ("correo", "email"),
    ("direccion", "address"),
    ("ciudad", "city"),
    ("en_que_ciudad_vives", "city"),
    ("departamento", "state"),
    ("estado", "state"),
    ("pais", "country"),
    ("platform", "platform"),
    ("por_que_deseas_estudiar_este_programa", "reason"),
    ("sobre_este_programa", "program_interest"),
    ("created_time", "created_time"),
    ("id", "id"),
];

#[derive(Debug)]
pub struct ColumnNormalizer {
    whitespace: Regex,
    synonyms: HashMap<&'static str, &'static str>,
}

impl ColumnNormalizer {
    pub fn new() -> Result<Self> {
        Ok(Self {
            whitespace: Regex::new(r"\s+").context("failed to compile whitespace regex")?,
            synonyms: COLUMN_SYNONYMS.iter().copied().collect(),
        })
    }

    pub fn clean(&self, raw: &str) -> String {
        let stripped = raw.replace('\u{feff}', "");
        let mut cleaned = String::with_capacity(stripped.len());
        for ch in stripped.trim().chars() {
            match CHARACTER_REPLACEMENTS.iter().find(|(from, _)| *from == ch) {
                Some((_, to)) => cleaned.push_str(to),
                None => cleaned.push(ch),
            }
        }

        let lowered = cleaned.to_lowercase();
        self.whitespace
            .replace_all(lowered.trim(), "_")
            .into_owned()
    }

    pub fn canonical(&self, raw: &str) -> String {
        let cleaned = self.clean(raw);
        match self.synonyms.get(cleaned.as_str()) {
            Some(canonical) => (*canonical).to_string(),
            None => cleaned,
        }
    }

    pub fn apply(&self, table: Table) -> Table {
        table.rename_columns(|column| self.canonical(column))
    }
}
