//! Step type for the import wizard

/// Represents the current step in the import wizard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WizardStep {
    #[default]
    SelectSource,
    Validate,
    MapColumns,
    Configure,
    Results,
}

impl WizardStep {
    pub fn number(&self) -> u8 {
        match self {
            Self::SelectSource => 1,
            Self::Validate => 2,
            Self::MapColumns => 3,
            Self::Configure => 4,
            Self::Results => 5,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::SelectSource => "Select Source",
            Self::Validate => "Validation Preview",
            Self::MapColumns => "Map Columns",
            Self::Configure => "Configure & Import",
            Self::Results => "Results",
        }
    }

    pub fn next(&self) -> Option<Self> {
        match self {
            Self::SelectSource => Some(Self::Validate),
            Self::Validate => Some(Self::MapColumns),
            Self::MapColumns => Some(Self::Configure),
            Self::Configure => Some(Self::Results),
            Self::Results => None,
        }
    }

    pub fn prev(&self) -> Option<Self> {
        match self {
            Self::SelectSource => None,
            Self::Validate => Some(Self::SelectSource),
            Self::MapColumns => Some(Self::Validate),
            Self::Configure => Some(Self::MapColumns),
            Self::Results => Some(Self::Configure),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_steps_are_linear() {
        let mut step = WizardStep::default();
        let mut numbers = vec![step.number()];
        while let Some(next) = step.next() {
            numbers.push(next.number());
            step = next;
        }
        assert_eq!(numbers, vec![1, 2, 3, 4, 5]);
        assert_eq!(WizardStep::SelectSource.prev(), None);
    }
}
