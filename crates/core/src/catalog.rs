//! Static profession catalog.

use serde::Serialize;

/// Catalog id that lets the user type their own profession name.
pub const OTHER_PROFESSION_ID: &str = "other";

/// Id stored on a profession entered through the `other` entry.
pub const CUSTOM_PROFESSION_ID: &str = "custom";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CatalogProfession {
    pub id: &'static str,
    pub name: &'static str,
}

const PROFESSIONS: [CatalogProfession; 11] = [
    CatalogProfession { id: "1", name: "Software Engineer" },
    CatalogProfession { id: "2", name: "Doctor" },
    CatalogProfession { id: "3", name: "Teacher" },
    CatalogProfession { id: "4", name: "Business Analyst" },
    CatalogProfession { id: "5", name: "Designer" },
    CatalogProfession { id: "6", name: "Marketing Manager" },
    CatalogProfession { id: "7", name: "Accountant" },
    CatalogProfession { id: "8", name: "Lawyer" },
    CatalogProfession { id: "9", name: "Chef" },
    CatalogProfession { id: "10", name: "Architect" },
    CatalogProfession { id: OTHER_PROFESSION_ID, name: "Other" },
];

pub fn professions() -> &'static [CatalogProfession] {
    &PROFESSIONS
}

/// Case-insensitive substring search over the catalog. The `other` entry is
/// always included so a custom name can be entered.
pub fn search_professions(query: &str) -> Vec<CatalogProfession> {
    let needle = query.trim().to_lowercase();
    PROFESSIONS
        .iter()
        .filter(|p| {
            needle.is_empty()
                || p.id == OTHER_PROFESSION_ID
                || p.name.to_lowercase().contains(&needle)
        })
        .copied()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_ends_with_other() {
        let list = professions();
        assert_eq!(list.len(), 11);
        assert_eq!(list.last().map(|p| p.id), Some(OTHER_PROFESSION_ID));
    }

    #[test]
    fn search_filters_but_keeps_other() {
        let hits = search_professions("eng");
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].name, "Software Engineer");
        assert_eq!(hits[1].id, OTHER_PROFESSION_ID);
    }

    #[test]
    fn empty_search_returns_everything() {
        assert_eq!(search_professions("  ").len(), 11);
    }
}
