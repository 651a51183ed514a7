//! Relocation plan prompt.
//!
//! Turns a completed intake form into the text prompt handed to the plan
//! generator. The partner lines only appear when someone else is moving too.

use crate::form::{Country, FamilySize, FormData, Profession};

/// Sections the generated plan must cover, in order.
pub const PLAN_SECTIONS: [&str; 8] = [
    "Visa Options",
    "Employment Prospects",
    "Location Analysis",
    "Timeline & Steps",
    "Cost Estimation",
    "Family Considerations",
    "Legal Requirements",
    "Practical Tips",
];

fn country_names(countries: &[Country]) -> String {
    countries
        .iter()
        .map(|c| c.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn profession_names(professions: &[Profession]) -> String {
    professions
        .iter()
        .map(|p| p.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn has_partner(data: &FormData) -> bool {
    !matches!(data.family_size, Some(FamilySize::JustMe))
}

/// Describe who is relocating.
pub fn family_composition(data: &FormData) -> String {
    match data.family_size {
        Some(FamilySize::JustMe) => "relocating alone".to_string(),
        Some(FamilySize::Couple) => "relocating with a partner".to_string(),
        Some(FamilySize::Family) => {
            let count = data
                .number_of_kids
                .unwrap_or(data.kids.len() as u32);
            let noun = if count == 1 { "child" } else { "children" };
            let ages = data
                .kids
                .iter()
                .map(|k| k.age.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            format!("relocating with a partner and {count} {noun} (ages: {ages})")
        }
        None => String::new(),
    }
}

fn section_detail(index: usize, data: &FormData) -> &'static str {
    match index {
        0 => "Analyze and recommend the most suitable visa pathways based on the profile.",
        1 => "Evaluate job market opportunities for the given professional background.",
        2 => "Suggest specific cities/regions within the chosen countries that best match the profile.",
        3 => "Outline a realistic timeline for the relocation process.",
        4 => "Provide a rough estimate of relocation costs.",
        5 if has_partner(data) => {
            "Include partner employment opportunities and family-specific requirements."
        }
        5 => "Not applicable (relocating alone).",
        6 => "List necessary documentation and legal procedures.",
        _ => "Offer advice on housing, banking, healthcare, and other essential services.",
    }
}

/// Build the relocation plan prompt for a form.
pub fn relocation_prompt(data: &FormData) -> String {
    let mut out = String::from("Create a detailed relocation plan for the following scenario:\n\n");

    out.push_str("PROFILE:\n");
    out.push_str(&format!(
        "- Citizenship: {}\n",
        country_names(&data.passport_countries)
    ));
    out.push_str(&format!(
        "- Desired Destinations: {}\n",
        country_names(&data.destination_countries)
    ));
    out.push_str(&format!("- Family Status: {}\n", family_composition(data)));
    out.push_str(&format!(
        "- Professional Background: {}\n",
        profession_names(&data.professions)
    ));
    if has_partner(data) {
        out.push_str(&format!(
            "- Partner's Professional Background: {}\n",
            profession_names(&data.partner_professions)
        ));
    }
    if let Some(budget) = data.budget {
        out.push_str(&format!("- Budget: {}\n", budget.label()));
    }
    if let Some(timeline) = data.timeline {
        out.push_str(&format!("- Timeline: {}\n", timeline.label()));
    }

    out.push_str("\nAdditional Context:\n");
    out.push_str(data.additional_info.trim());
    out.push_str("\n\nPlease provide a comprehensive relocation plan that includes:\n");
    for (i, section) in PLAN_SECTIONS.iter().enumerate() {
        out.push_str(&format!("{}. {section}: {}\n", i + 1, section_detail(i, data)));
    }
    out.push_str(
        "\nFocus on providing actionable insights and specific recommendations rather than general information.",
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::{BudgetTier, Child};

    fn family_form() -> FormData {
        FormData {
            destination_countries: vec![
                Country::new("US", "United States"),
                Country::new("CA", "Canada"),
            ],
            passport_countries: vec![Country::new("GB", "United Kingdom")],
            family_size: Some(FamilySize::Family),
            number_of_kids: Some(2),
            kids: vec![
                Child { id: "a".into(), age: 5 },
                Child { id: "b".into(), age: 8 },
            ],
            professions: vec![Profession {
                id: "1".into(),
                name: "Software Engineer".into(),
            }],
            partner_professions: vec![Profession {
                id: "3".into(),
                name: "Teacher".into(),
            }],
            additional_info: "Looking for tech hubs with good schools".into(),
            ..FormData::default()
        }
    }

    #[test]
    fn family_prompt_lists_partner_and_children() {
        let prompt = relocation_prompt(&family_form());
        assert!(prompt.contains("- Citizenship: United Kingdom"));
        assert!(prompt.contains("- Desired Destinations: United States, Canada"));
        assert!(prompt.contains("relocating with a partner and 2 children (ages: 5, 8)"));
        assert!(prompt.contains("- Partner's Professional Background: Teacher"));
        assert!(prompt.contains("Looking for tech hubs with good schools"));
        assert!(prompt.contains("6. Family Considerations: Include partner employment"));
    }

    #[test]
    fn solo_prompt_omits_partner() {
        let data = FormData {
            family_size: Some(FamilySize::JustMe),
            ..family_form()
        };
        let prompt = relocation_prompt(&data);
        assert!(prompt.contains("relocating alone"));
        assert!(!prompt.contains("Partner's Professional Background"));
        assert!(prompt.contains("Not applicable (relocating alone)."));
    }

    #[test]
    fn one_child_is_singular() {
        let data = FormData {
            number_of_kids: Some(1),
            kids: vec![Child { id: "a".into(), age: 0 }],
            ..family_form()
        };
        assert_eq!(
            family_composition(&data),
            "relocating with a partner and 1 child (ages: 0)"
        );
    }

    #[test]
    fn all_sections_are_numbered() {
        let data = FormData {
            budget: Some(BudgetTier::Medium),
            ..FormData::default()
        };
        let prompt = relocation_prompt(&data);
        for (i, section) in PLAN_SECTIONS.iter().enumerate() {
            assert!(prompt.contains(&format!("{}. {section}:", i + 1)));
        }
        assert!(prompt.contains("- Budget: $10k - $50k"));
    }
}
