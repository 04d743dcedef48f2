//! Supervisor signature block rule

/// Name printed in the template's signature table
pub const TEMPLATE_SUPERVISOR: &str = "Ing. Mauricio Sánchez Pinos";

pub const KNOWN_SUPERVISORS: &[&str] = &[
    "Ing. Mauricio Sánchez Pinos",
    "Ing. Mesías Vizuete López",
    "Ing. Felipe Zumba Arichavala",
    "Ing. Ramiro Hurtado Figueroa",
];

const RETITLED_SUPERVISOR: &str = "Ing. Mesías Vizuete López";
const TEMPLATE_TITLE: &str = "PROFESIONAL TÉCNICO 1";
const RETITLED_TITLE: &str = "ANALISTA TÉCNICO 2";

/// Text swaps applied to body table cells for the selected supervisor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupervisorRule {
    pub selected: String,
}

impl SupervisorRule {
    pub fn new(selected: impl Into<String>) -> Self {
        Self {
            selected: selected.into(),
        }
    }

    /// (from, to) pairs in application order
    pub fn replacements(&self) -> Vec<(&str, &str)> {
        let mut pairs = Vec::new();
        if self.selected != TEMPLATE_SUPERVISOR {
            pairs.push((TEMPLATE_SUPERVISOR, self.selected.as_str()));
        }
        if self.selected == RETITLED_SUPERVISOR {
            pairs.push((TEMPLATE_TITLE, RETITLED_TITLE));
        }
        pairs
    }

    pub fn is_known(&self) -> bool {
        KNOWN_SUPERVISORS.contains(&self.selected.as_str())
    }
}

impl Default for SupervisorRule {
    fn default() -> Self {
        Self::new(TEMPLATE_SUPERVISOR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_supervisor_needs_no_swap() {
        assert!(SupervisorRule::default().replacements().is_empty());
    }

    #[test]
    fn test_retitled_supervisor_swaps_title() {
        let rule = SupervisorRule::new("Ing. Mesías Vizuete López");
        assert_eq!(
            rule.replacements(),
            vec![
                ("Ing. Mauricio Sánchez Pinos", "Ing. Mesías Vizuete López"),
                ("PROFESIONAL TÉCNICO 1", "ANALISTA TÉCNICO 2"),
            ]
        );
        assert!(rule.is_known());
    }

    #[test]
    fn test_other_supervisor_keeps_title() {
        let rule = SupervisorRule::new("Ing. Felipe Zumba Arichavala");
        assert_eq!(rule.replacements().len(), 1);
        assert!(!SupervisorRule::new("Ing. Nadie").is_known());
    }
}
