//! Templated explanations assembled from an ordered table of rules.
//!
//! Each rule inspects the original, unfilled user and destination attributes
//! and contributes at most one fragment. Comparisons against missing values
//! never fire.

use relocation_core::{CountryRecord, Region, UserProfile};

/// Sentence used when no rule contributes a fragment.
pub const FALLBACK_EXPLANATION: &str =
    "Recommended based on overall fit with your preferences and constraints.";

const ARABIC_CULTURE_THRESHOLD: f64 = 0.7;
const ENGLISH_CULTURE_THRESHOLD: f64 = 0.3;
const DIASPORA_THRESHOLD: f64 = 0.6;
const SAFETY_THRESHOLD: f64 = 0.7;

/// Signature shared by explanation rules.
pub type RuleFn = fn(&UserProfile, &CountryRecord) -> Option<&'static str>;

/// A named rule contributing zero or one fragment.
#[derive(Debug, Clone, Copy)]
pub struct ExplanationRule {
    name: &'static str,
    rule: RuleFn,
}

impl ExplanationRule {
    /// Name a rule.
    #[must_use]
    pub const fn new(name: &'static str, rule: RuleFn) -> Self {
        Self { name, rule }
    }

    /// Rule name, used in logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Evaluate the rule.
    #[must_use]
    pub fn evaluate(&self, user: &UserProfile, country: &CountryRecord) -> Option<&'static str> {
        (self.rule)(user, country)
    }
}

const STANDARD_RULES: [ExplanationRule; 6] = [
    ExplanationRule::new("region_preference", region_preference),
    ExplanationRule::new("arabic_culture", arabic_culture),
    ExplanationRule::new("english_environment", english_environment),
    ExplanationRule::new("budget_fit", budget_fit),
    ExplanationRule::new("diaspora", diaspora),
    ExplanationRule::new("safety", safety),
];

/// Builds explanation sentences from an ordered list of rules.
///
/// # Examples
/// ```
/// use relocation_core::{CountryRecord, UserProfile};
/// use relocation_scorer::Explainer;
///
/// let mut country = CountryRecord::new("NO");
/// country.safety_index = Some(0.9);
/// assert_eq!(
///     Explainer::default().explain(&UserProfile::new(), &country),
///     "Recommended because offers relatively higher safety and stability."
/// );
/// ```
#[derive(Debug, Clone)]
pub struct Explainer {
    rules: Vec<ExplanationRule>,
}

impl Default for Explainer {
    fn default() -> Self {
        Self {
            rules: STANDARD_RULES.to_vec(),
        }
    }
}

impl Explainer {
    /// Build an explainer evaluating `rules` in order.
    #[must_use]
    pub const fn new(rules: Vec<ExplanationRule>) -> Self {
        Self { rules }
    }

    /// Append a rule evaluated after the existing ones.
    #[must_use]
    pub fn with_rule(mut self, rule: ExplanationRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Rules in evaluation order.
    #[must_use]
    pub fn rules(&self) -> &[ExplanationRule] {
        &self.rules
    }

    /// Explain why `country` suits `user`.
    #[must_use]
    pub fn explain(&self, user: &UserProfile, country: &CountryRecord) -> String {
        let fragments: Vec<&str> = self
            .fired(user, country)
            .map(|(name, fragment)| {
                log::debug!(
                    "explanation rule {name} matched {}",
                    country.country_code
                );
                fragment
            })
            .collect();
        if fragments.is_empty() {
            FALLBACK_EXPLANATION.to_owned()
        } else {
            format!("Recommended because {}.", fragments.join(", "))
        }
    }

    /// Name and fragment of each rule that fires, in rule order.
    fn fired<'a>(
        &'a self,
        user: &'a UserProfile,
        country: &'a CountryRecord,
    ) -> impl Iterator<Item = (&'static str, &'static str)> + 'a {
        self.rules
            .iter()
            .filter_map(|rule| Some((rule.name(), rule.evaluate(user, country)?)))
    }
}

/// Explain `country` for `user` with the standard rules.
#[must_use]
pub fn explain(user: &UserProfile, country: &CountryRecord) -> String {
    Explainer::default().explain(user, country)
}

fn region_preference(user: &UserProfile, country: &CountryRecord) -> Option<&'static str> {
    let region = country.region_group.filter(|region| user.prefers(*region))?;
    match region {
        Region::Gulf => Some("matches your preference for Gulf countries"),
        Region::EastAfrica => Some("matches your preference for East Africa"),
        Region::NorthAfrica => Some("matches your preference for North Africa"),
        Region::Europe => Some("matches your preference for Europe"),
        Region::UkIreland => Some("matches your preference for the UK and Ireland"),
        Region::Canada => Some("matches your preference for Canada"),
        Region::Usa => Some("matches your preference for the USA"),
        Region::Asia => Some("matches your preference for Asia"),
        Region::Anywhere => None,
    }
}

fn arabic_culture(user: &UserProfile, country: &CountryRecord) -> Option<&'static str> {
    let wants_arabic = user
        .cultural_preference
        .as_deref()
        .is_some_and(|preference| preference.to_lowercase().contains("arabic"));
    let compatible = country
        .cultural_compatibility_score
        .is_some_and(|score| score > ARABIC_CULTURE_THRESHOLD);
    (wants_arabic && compatible).then_some("has strong Arabic and cultural similarity")
}

fn english_environment(user: &UserProfile, country: &CountryRecord) -> Option<&'static str> {
    let compatible = country
        .cultural_compatibility_score
        .is_some_and(|score| score > ENGLISH_CULTURE_THRESHOLD);
    (user.lang_english == Some(true) && compatible)
        .then_some("supports English or mixed language environments")
}

fn budget_fit(user: &UserProfile, country: &CountryRecord) -> Option<&'static str> {
    let budget = user.budget_estimated_usd?;
    let minimum = country.min_budget_required?;
    Some(if budget >= minimum {
        "fits your stated monthly budget"
    } else {
        "may be challenging given your budget"
    })
}

fn diaspora(_user: &UserProfile, country: &CountryRecord) -> Option<&'static str> {
    country
        .diaspora_presence_score
        .is_some_and(|score| score >= DIASPORA_THRESHOLD)
        .then_some("has a significant Sudanese community")
}

fn safety(_user: &UserProfile, country: &CountryRecord) -> Option<&'static str> {
    country
        .safety_index
        .is_some_and(|score| score >= SAFETY_THRESHOLD)
        .then_some("offers relatively higher safety and stability")
}
