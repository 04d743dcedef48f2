//! Placeholder tokens and their resolved values

use serde::Serialize;

/// Tokens the template author embeds verbatim
pub mod tokens {
    pub const PROVINCE: &str = "«PROVINCIA»";
    pub const PROVINCE_TITLE: &str = "«Provincia»";
    pub const CANTON: &str = "«CANTÓN»";
    pub const CANTON_TITLE: &str = "«Cantón»";
    pub const LOCALITY: &str = "«PARROQUIA»";
    pub const LOCALITY_TITLE: &str = "«Parroquia»";
    pub const REPORT_NUMBER: &str = "«NÚMERO__DE_INFORME»";
    pub const REPORT_DATE: &str = "«FECHA_DE_INFORME»";
    pub const MEASURED_VALUE: &str = "«VALOR_MEDIDO»";
    pub const OPERATOR_COVERAGE: &str = "«COBERTURA_OPERADORA»";
    pub const MEETS_TARGET_ARCOTEL: &str = "«ALCANZA_VALOR_OBJETIVO_ARCOTEL»";
    pub const TOTAL_SAMPLES_ARCOTEL: &str = "«NUMERO_TOTAL_DE_MUESTRAS_ARCOTEL»";
    pub const VALID_SAMPLES_ARCOTEL: &str = "«NUMERO_VALIDAS_ARCOTEL»";
    pub const VALID_SPEED_SAMPLES_ARCOTEL: &str = "«MUESTRAS_VALIDAS_VELOCIDAD_ARCOTEL»";
    pub const MAP_CHANGE_ARCOTEL: &str = "«REQUIERE_MODIFICAR_MAPA_DE_COBERTURA_ARC»";
    pub const VALID_SAMPLES_PCT_OPERATOR: &str = "«PORCENTAJE_DE_MUESTRAS_VALIDAS_OPERADORA»";
    pub const MEETS_TARGET_OPERATOR: &str = "«ALCANZA_VALOR_OBJETIVO_OPERADORA»";
    pub const MAP_CHANGE_OPERATOR: &str = "«REQUIERE_MODIFICAR_MAPA_DE_COBERTURA_OPE»";

    /// Appears three times; resolved by occurrence order
    pub const SCHEDULE_DATE: &str = "«FECHA_CRONOGRAMA_DE_MEDICION_2024»";

    pub const BACKGROUND_DATE: &str = "«FECHA_ANTECEDENTES»";
    pub const TESTS_DATE: &str = "«FECHA_PRUEBAS_REALIZADAS»";
    pub const CONCLUSIONS_DATE: &str = "«FECHA_CONCLUSIONES»";
}

/// The three renderings of the measurement schedule date
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleDateValues {
    /// Month name only, used in the background section
    pub antecedentes: String,
    /// `DD/MM/YYYY`, used in the tests section
    pub pruebas_realizadas: String,
    /// Long form, used in the conclusions
    pub conclusiones: String,
}

impl ScheduleDateValues {
    pub fn in_order(&self) -> [&str; 3] {
        [
            &self.antecedentes,
            &self.pruebas_realizadas,
            &self.conclusiones,
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlaceholderMap {
    entries: Vec<(String, String)>,
    pub schedule: ScheduleDateValues,
}

impl PlaceholderMap {
    pub fn new(schedule: ScheduleDateValues) -> Self {
        Self {
            entries: Vec::new(),
            schedule,
        }
    }

    pub fn insert(&mut self, token: impl Into<String>, value: impl Into<String>) {
        let token = token.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(t, _)| *t == token) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((token, value)),
        }
    }

    pub fn get(&self, token: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(t, _)| t == token)
            .map(|(_, v)| v.as_str())
    }

    /// Plain tokens in insertion order (the sequenced date token excluded)
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(t, v)| (t.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
