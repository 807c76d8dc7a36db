pub mod approx;

use crate::domain::company::Company;
use approx::ScoreParams;
use serde::Serialize;

pub const DEFAULT_THRESHOLD: f64 = 0.4;
pub const DEFAULT_DISTANCE: usize = 100;
pub const DEFAULT_LIMIT: usize = 50;

#[derive(Debug, Clone, PartialEq)]
pub struct SearchOptions {
    /// Field scores above this are not matches. 0.0 is exact, 1.0 accepts anything.
    pub threshold: f64,
    /// Expected match position within a field.
    pub location: usize,
    /// How far from `location` a match may drift before it is penalized to 1.0.
    pub distance: usize,
    pub limit: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            location: 0,
            distance: DEFAULT_DISTANCE,
            limit: DEFAULT_LIMIT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchField {
    Name,
    IndustryGroup,
    Country,
}

impl SearchField {
    pub const ALL: [SearchField; 3] = [
        SearchField::Name,
        SearchField::IndustryGroup,
        SearchField::Country,
    ];

    fn value(self, company: &Company) -> &str {
        match self {
            SearchField::Name => &company.name,
            SearchField::IndustryGroup => &company.industry_group,
            SearchField::Country => &company.country,
        }
    }

    // Keys are weighted equally; weights sum to 1.
    fn weight(self) -> f64 {
        1.0 / Self::ALL.len() as f64
    }
}

#[derive(Debug, Clone)]
pub struct SearchHit<'a> {
    pub company: &'a Company,
    /// Position in the catalog; used as the tie-breaker.
    pub index: usize,
    pub score: f64,
    pub matched: Vec<SearchField>,
}

/// Companies matching `query`, best first.
///
/// A blank query returns every company in dataset order without a cap.
pub fn search<'a>(companies: &'a [Company], query: &str, opts: &SearchOptions) -> Vec<&'a Company> {
    if query.trim().is_empty() {
        return companies.iter().collect();
    }
    rank(companies, query, opts)
        .into_iter()
        .map(|hit| hit.company)
        .collect()
}

/// Scored matches for a non-blank query, sorted by score then catalog order and
/// truncated to `opts.limit`.
pub fn rank<'a>(companies: &'a [Company], query: &str, opts: &SearchOptions) -> Vec<SearchHit<'a>> {
    let pattern: Vec<char> = query.trim().to_lowercase().chars().collect();
    if pattern.is_empty() {
        return Vec::new();
    }
    let params = ScoreParams {
        location: opts.location,
        distance: opts.distance,
    };

    let mut hits: Vec<SearchHit<'a>> = companies
        .iter()
        .enumerate()
        .filter_map(|(index, company)| {
            let mut total = 1.0_f64;
            let mut matched = Vec::new();
            for field in SearchField::ALL {
                let value = field.value(company);
                let text: Vec<char> = value.to_lowercase().chars().collect();
                let Some(field_score) = approx::score(&pattern, &text, params) else {
                    continue;
                };
                if field_score > opts.threshold {
                    continue;
                }
                let exponent = field.weight() * approx::field_norm(value);
                total *= field_score.max(f64::EPSILON).powf(exponent);
                matched.push(field);
            }
            if matched.is_empty() {
                return None;
            }
            Some(SearchHit {
                company,
                index,
                score: total,
                matched,
            })
        })
        .collect();

    hits.sort_by(|a, b| a.score.total_cmp(&b.score).then(a.index.cmp(&b.index)));
    hits.truncate(opts.limit);
    hits
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::company::fixtures::company;

    fn dataset() -> Vec<Company> {
        vec![
            company("1-800-FLOWERS.COM, Inc.", "Retailing", "United States of America", "28.9"),
            company("1&1 AG", "Telecommunication Services", "Germany", "27.0"),
            company("11 Bit Studios SA", "Software & Services", "Poland", "16.3"),
            company("Acne Holdings", "Pharmaceuticals", "Sweden", "22.0"),
            company("Acme Corp", "Retailing", "United States of America", "18.0"),
        ]
    }

    fn names(found: &[&Company]) -> Vec<String> {
        found.iter().map(|c| c.name.clone()).collect()
    }

    #[test]
    fn lowercase_partial_query_finds_company() {
        let data = dataset();
        let found = search(&data, "acme", &SearchOptions::default());
        assert!(names(&found).contains(&"Acme Corp".to_string()));
        assert_eq!(found[0].name, "Acme Corp");
    }

    #[test]
    fn exact_match_outranks_earlier_typo_match() {
        let data = dataset();
        let hits = rank(&data, "acme", &SearchOptions::default());
        let acme = hits.iter().position(|h| h.company.name == "Acme Corp").unwrap();
        let acne = hits
            .iter()
            .position(|h| h.company.name == "Acne Holdings")
            .unwrap();
        assert!(acme < acne);
    }

    #[test]
    fn unrelated_query_returns_nothing() {
        let data = dataset();
        assert!(search(&data, "zzz_no_such_company", &SearchOptions::default()).is_empty());
    }

    #[test]
    fn blank_query_returns_whole_catalog_in_order() {
        let data = dataset();
        for q in ["", "   ", "\t\n"] {
            let found = search(&data, q, &SearchOptions::default());
            assert_eq!(found.len(), data.len());
            assert_eq!(names(&found), data.iter().map(|c| c.name.clone()).collect::<Vec<_>>());
        }
    }

    #[test]
    fn matches_country_and_industry() {
        let data = dataset();
        let found = search(&data, "germany", &SearchOptions::default());
        assert_eq!(names(&found), vec!["1&1 AG".to_string()]);

        let hits = rank(&data, "retailing", &SearchOptions::default());
        assert_eq!(hits.len(), 2);
        assert!(hits.iter().all(|h| h.matched.contains(&SearchField::IndustryGroup)));
        // Equal scores keep catalog order.
        assert_eq!(hits[0].company.name, "1-800-FLOWERS.COM, Inc.");
    }

    #[test]
    fn every_hit_matched_some_field() {
        let data = dataset();
        for q in ["acme", "serv", "united", "poland", "x"] {
            for hit in rank(&data, q, &SearchOptions::default()) {
                assert!(!hit.matched.is_empty(), "query {q} hit {}", hit.company.name);
                assert!(hit.score <= 1.0);
            }
        }
    }

    #[test]
    fn results_are_capped() {
        let data: Vec<Company> = (0..120)
            .map(|i| company(&format!("Company {i}"), "Retailing", "USA", "20"))
            .collect();
        let found = search(&data, "company", &SearchOptions::default());
        assert_eq!(found.len(), DEFAULT_LIMIT);
        assert_eq!(found[0].name, "Company 0");
        assert_eq!(found[49].name, "Company 49");

        let opts = SearchOptions {
            limit: 5,
            ..SearchOptions::default()
        };
        assert_eq!(search(&data, "company", &opts).len(), 5);
    }

    #[test]
    fn stricter_threshold_drops_typos() {
        let data = dataset();
        let strict = SearchOptions {
            threshold: 0.1,
            ..SearchOptions::default()
        };
        let found = names(&search(&data, "acne", &strict));
        assert_eq!(found, vec!["Acne Holdings".to_string()]);
    }

    #[test]
    fn late_matches_fall_outside_distance() {
        let data = vec![company(
            "The Very Long Holding Company Of Northern Territories Acme",
            "Retailing",
            "USA",
            "20",
        )];
        assert!(search(&data, "acme", &SearchOptions::default()).is_empty());
    }
}
