use std::collections::BTreeSet;

use directory::Directory;

/// Selection membership resolved down to geometry identifiers.
///
/// Region names in the selected list expand to every member country's code;
/// names with no directory entry contribute nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionMembership {
    pub codes: BTreeSet<u32>,
    /// Numeric code of the exact focus country, when the focus is a country
    /// with known geometry identity.
    pub focus_code: Option<u32>,
}

impl SelectionMembership {
    pub fn resolve(
        all_selected: &[String],
        focus_country: Option<&str>,
        dir: &Directory,
    ) -> Self {
        let mut codes = BTreeSet::new();
        for name in all_selected {
            if let Some(code) = dir.num_code(name) {
                codes.insert(code);
            } else {
                for member in dir.countries_of_region(name) {
                    if let Some(code) = dir.num_code(member) {
                        codes.insert(code);
                    }
                }
            }
        }

        Self {
            codes,
            focus_code: focus_country.and_then(|name| dir.num_code(name)),
        }
    }

    pub fn contains(&self, code: u32) -> bool {
        self.codes.contains(&code)
    }

    pub fn is_focus(&self, code: u32) -> bool {
        self.focus_code == Some(code)
    }
}
