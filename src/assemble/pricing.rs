//! Price and period tokens embedded in plan feature lines

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

use crate::schema::PricingPlan;

lazy_static! {
    static ref PRICE: Regex = Regex::new(r"\$\d{1,3}(?:,\d{3})+(?:\.\d+)?|\$\d+(?:\.\d+)?")
        .expect("valid price pattern");
    static ref PERIOD: Regex = Regex::new(r"(?i)\bper\s+\w+").expect("valid period pattern");
    static ref SPACE_BEFORE_PUNCT: Regex = Regex::new(r"\s+([,:;.])").expect("valid punctuation pattern");
}

/// Characters stripped from the ends of the remaining description
const SEPARATORS: &[char] = &['-', '–', '—', ':', '|', ',', '•'];

/// A feature line split into its parts
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureLine {
    /// `$25`, `$1,299.99`
    pub price: Option<String>,
    /// `per month`
    pub period: Option<String>,
    /// What is left once the tokens are cut out
    pub description: String,
}

fn is_separator(c: char) -> bool {
    SEPARATORS.contains(&c)
}

/// A price stands on its own when a line end or a separator borders it.
/// `text` has the period already blanked out.
fn stands_alone(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].trim_end();
    let after = text[end..].trim_start();
    before.is_empty()
        || after.is_empty()
        || before.ends_with(is_separator)
        || after.starts_with(is_separator)
}

/// Split a free-text feature line.
///
/// The first `per <unit>` is extracted, and so is the first `$amount` that
/// leads or trails its segment of the line. A price inside a sentence stays
/// in the description. A line with neither token is kept verbatim.
pub fn parse_feature_line(line: &str) -> FeatureLine {
    let period = PERIOD.find(line);

    // Blank the period out, keeping byte offsets
    let masked = match period {
        Some(m) => format!("{}{}{}", &line[..m.start()], " ".repeat(m.len()), &line[m.end()..]),
        None => line.to_string(),
    };
    let price = PRICE
        .find_iter(&masked)
        .find(|m| stands_alone(&masked, m.start(), m.end()));

    if price.is_none() && period.is_none() {
        return FeatureLine {
            price: None,
            period: None,
            description: line.to_string(),
        };
    }

    let mut cuts: Vec<(usize, usize)> = price
        .iter()
        .chain(period.iter())
        .map(|m| (m.start(), m.end()))
        .collect();
    cuts.sort_unstable();

    let mut remainder = String::with_capacity(line.len());
    let mut pos = 0;
    for (start, end) in cuts {
        if start < pos {
            continue;
        }
        remainder.push_str(&line[pos..start]);
        remainder.push(' ');
        pos = end;
    }
    remainder.push_str(&line[pos..]);

    let collapsed = remainder.split_whitespace().collect::<Vec<_>>().join(" ");
    let description = SPACE_BEFORE_PUNCT
        .replace_all(&collapsed, "$1")
        .trim_matches(|c: char| c.is_whitespace() || is_separator(c))
        .to_string();

    FeatureLine {
        price: price.map(|m| m.as_str().to_string()),
        period: period.map(|m| m.as_str().to_string()),
        description,
    }
}

/// A plan ready to display, feature lines parsed
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanDisplay {
    pub name: String,
    pub price: String,
    pub period: String,
    pub description: String,
    pub highlighted: bool,
    pub cta_text: String,
    pub cta_link: String,
    pub features: Vec<FeatureLine>,
}

impl From<&PricingPlan> for PlanDisplay {
    fn from(plan: &PricingPlan) -> Self {
        Self {
            name: plan.name.clone(),
            price: plan.price.clone(),
            period: plan.period.clone(),
            description: plan.description.clone(),
            highlighted: plan.highlighted,
            cta_text: plan.cta_text.clone(),
            cta_link: plan.cta_link.clone(),
            features: plan.features.iter().map(|f| parse_feature_line(f)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_period_and_description() {
        let line = parse_feature_line("Monthly filter change - $25 per month");
        assert_eq!(line.price.as_deref(), Some("$25"));
        assert_eq!(line.period.as_deref(), Some("per month"));
        assert_eq!(line.description, "Monthly filter change");
    }

    #[test]
    fn test_leading_price() {
        let line = parse_feature_line("$1,299.99 – Full system flush, per visit");
        assert_eq!(line.price.as_deref(), Some("$1,299.99"));
        assert_eq!(line.period.as_deref(), Some("per visit"));
        assert_eq!(line.description, "Full system flush");
    }

    #[test]
    fn test_price_only() {
        let line = parse_feature_line("Priority scheduling: $49");
        assert_eq!(line.price.as_deref(), Some("$49"));
        assert_eq!(line.period, None);
        assert_eq!(line.description, "Priority scheduling");
    }

    #[test]
    fn test_period_is_case_insensitive() {
        let line = parse_feature_line("Two tune-ups Per Year");
        assert_eq!(line.price, None);
        assert_eq!(line.period.as_deref(), Some("Per Year"));
        assert_eq!(line.description, "Two tune-ups");
    }

    #[test]
    fn test_price_stops_before_separator_comma() {
        let line = parse_feature_line("Filter change $25, billed per month");
        assert_eq!(line.price.as_deref(), Some("$25"));
        assert_eq!(line.period.as_deref(), Some("per month"));
        assert_eq!(line.description, "Filter change, billed");

        let line = parse_feature_line("Duct sealing - $1,250, per home");
        assert_eq!(line.price.as_deref(), Some("$1,250"));
        assert_eq!(line.description, "Duct sealing");
    }

    #[test]
    fn test_price_inside_sentence_stays_in_description() {
        let line = parse_feature_line("Save $50 on any repair");
        assert_eq!(line.price, None);
        assert_eq!(line.period, None);
        assert_eq!(line.description, "Save $50 on any repair");

        let line = parse_feature_line("Save $50 on repairs per year");
        assert_eq!(line.price, None);
        assert_eq!(line.period.as_deref(), Some("per year"));
        assert_eq!(line.description, "Save $50 on repairs");
    }

    #[test]
    fn test_no_tokens_is_verbatim() {
        let line = parse_feature_line("  15% off repairs -  ");
        assert_eq!(line.price, None);
        assert_eq!(line.period, None);
        assert_eq!(line.description, "  15% off repairs -  ");
    }

    #[test]
    fn test_plan_display() {
        let plan = PricingPlan {
            name: "Comfort Club".to_string(),
            features: vec![
                "Monthly filter change - $25 per month".to_string(),
                "No overtime charges".to_string(),
            ],
            ..Default::default()
        };
        let display = PlanDisplay::from(&plan);
        assert_eq!(display.features.len(), 2);
        assert_eq!(display.features[1].description, "No overtime charges");
    }
}
