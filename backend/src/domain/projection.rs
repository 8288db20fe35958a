//! Pure roster projection: filtering and group-by counts.
//!
//! [`project`] takes the full roster plus a filter specification and produces
//! the filtered subsequence alongside aggregate counts. It holds no state and
//! performs no I/O; given the same inputs the output is always identical.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::camper::Camper;

/// Filter specification. All fields are optional and compose by logical AND;
/// an absent field matches every record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema, IntoParams)]
#[serde(rename_all = "camelCase", default)]
pub struct RosterFilter {
    /// Case-insensitive substring match against the camper name.
    pub name_contains: Option<String>,
    /// Exact match against the camper area.
    pub area: Option<String>,
    /// Case-insensitive exact match against the camper team.
    pub team: Option<String>,
    /// Exact match against the bus-arrival flag.
    pub arrived_for_bus: Option<bool>,
    /// Exact match against the camp-site-arrival flag.
    pub arrived_camp_site: Option<bool>,
}

impl RosterFilter {
    /// Whether a single camper satisfies every specified criterion.
    #[must_use]
    pub fn matches(&self, camper: &Camper) -> bool {
        if let Some(fragment) = &self.name_contains {
            if !camper
                .name
                .to_lowercase()
                .contains(&fragment.to_lowercase())
            {
                return false;
            }
        }
        if let Some(area) = &self.area {
            if camper.area != *area {
                return false;
            }
        }
        if let Some(team) = &self.team {
            if !camper.team.eq_ignore_ascii_case(team) {
                return false;
            }
        }
        if let Some(arrived) = self.arrived_for_bus {
            if camper.arrived_for_bus != arrived {
                return false;
            }
        }
        if let Some(arrived) = self.arrived_camp_site {
            if camper.arrived_camp_site != arrived {
                return false;
            }
        }
        true
    }
}

/// Arrived/pending tally for one milestone over the whole roster.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MilestoneCounts {
    pub arrived: usize,
    pub pending: usize,
}

/// Group-by counts derived from the *unfiltered* roster, so the UI can show
/// bucket sizes even while a filter is active.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RosterCounts {
    /// Total number of registered campers.
    pub total: usize,
    /// One bucket per distinct observed area value.
    pub by_area: BTreeMap<String, usize>,
    /// One bucket per known team; unknown team values are not bucketed.
    pub by_team: BTreeMap<String, usize>,
    pub bus: MilestoneCounts,
    pub camp_site: MilestoneCounts,
}

/// The filtered subsequence plus the roster-wide counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Projection {
    pub campers: Vec<Camper>,
    pub counts: RosterCounts,
}

/// Project the roster through `filter`, counting over the unfiltered input.
///
/// Team buckets are fixed against `known_teams` (matched case-insensitively);
/// area buckets are open and track every observed value. Ordering of the
/// filtered subsequence follows the input roster.
#[must_use]
pub fn project(roster: &[Camper], filter: &RosterFilter, known_teams: &[String]) -> Projection {
    let mut counts = RosterCounts {
        total: roster.len(),
        ..RosterCounts::default()
    };
    for team in known_teams {
        counts.by_team.insert(team.clone(), 0);
    }

    for camper in roster {
        *counts.by_area.entry(camper.area.clone()).or_insert(0) += 1;
        for team in known_teams {
            if camper.team.eq_ignore_ascii_case(team) {
                if let Some(bucket) = counts.by_team.get_mut(team) {
                    *bucket += 1;
                }
            }
        }
        if camper.arrived_for_bus {
            counts.bus.arrived += 1;
        } else {
            counts.bus.pending += 1;
        }
        if camper.arrived_camp_site {
            counts.camp_site.arrived += 1;
        } else {
            counts.camp_site.pending += 1;
        }
    }

    let campers = roster
        .iter()
        .filter(|camper| filter.matches(camper))
        .cloned()
        .collect();

    Projection { campers, counts }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::camper::CamperId;
    use chrono::Utc;
    use rstest::rstest;

    fn camper(name: &str, area: &str, team: &str, bus: bool, camp: bool) -> Camper {
        let now = Utc::now();
        Camper {
            id: CamperId::random(),
            name: name.into(),
            age: 14,
            phone_number: "0771234567".into(),
            area: area.into(),
            team: team.into(),
            school: "ABC".into(),
            remarks: None,
            payment: None,
            image_ref: None,
            arrived_for_bus: bus,
            arrived_camp_site: camp,
            version: 1,
            created_at: now,
            updated_at: now,
        }
    }

    fn known_teams() -> Vec<String> {
        ["Vikings", "ThunderBolts", "Gladiators", "Volcanoes"]
            .into_iter()
            .map(String::from)
            .collect()
    }

    #[rstest]
    fn filters_compose_by_logical_and() {
        let a = camper("Nimal", "Wattala", "Vikings", true, false);
        let b = camper("Kamal", "Wattala", "Gladiators", false, false);
        let roster = vec![a.clone(), b];
        let filter = RosterFilter {
            area: Some("Wattala".into()),
            arrived_for_bus: Some(true),
            ..RosterFilter::default()
        };

        let projection = project(&roster, &filter, &known_teams());

        assert_eq!(projection.campers, vec![a]);
    }

    #[rstest]
    #[case("nim", 1)]
    #[case("NIMAL", 1)]
    #[case("ma", 2)]
    #[case("zz", 0)]
    fn name_search_is_case_insensitive_substring(#[case] fragment: &str, #[case] expected: usize) {
        let roster = vec![
            camper("Nimal", "Wattala", "Vikings", false, false),
            camper("Kamal", "Dematagoda", "Gladiators", false, false),
        ];
        let filter = RosterFilter {
            name_contains: Some(fragment.into()),
            ..RosterFilter::default()
        };

        let projection = project(&roster, &filter, &known_teams());

        assert_eq!(projection.campers.len(), expected);
    }

    #[rstest]
    fn team_match_ignores_case_but_area_is_exact() {
        let roster = vec![camper("Nimal", "Wattala", "Vikings", false, false)];

        let by_team = RosterFilter {
            team: Some("vikings".into()),
            ..RosterFilter::default()
        };
        assert_eq!(project(&roster, &by_team, &known_teams()).campers.len(), 1);

        let by_area = RosterFilter {
            area: Some("wattala".into()),
            ..RosterFilter::default()
        };
        assert!(project(&roster, &by_area, &known_teams()).campers.is_empty());
    }

    #[rstest]
    fn counts_cover_the_unfiltered_roster() {
        let roster = vec![
            camper("Nimal", "Wattala", "Vikings", true, false),
            camper("Kamal", "Wattala", "Gladiators", false, true),
            camper("Sunil", "Dematagoda", "Vikings", false, false),
        ];
        let filter = RosterFilter {
            area: Some("Dematagoda".into()),
            ..RosterFilter::default()
        };

        let projection = project(&roster, &filter, &known_teams());

        assert_eq!(projection.campers.len(), 1);
        assert_eq!(projection.counts.total, 3);
        assert_eq!(projection.counts.by_area.get("Wattala"), Some(&2));
        assert_eq!(projection.counts.by_area.get("Dematagoda"), Some(&1));
        assert_eq!(projection.counts.by_team.get("Vikings"), Some(&2));
        assert_eq!(projection.counts.by_team.get("Gladiators"), Some(&1));
        assert_eq!(projection.counts.bus.arrived, 1);
        assert_eq!(projection.counts.bus.pending, 2);
        assert_eq!(projection.counts.camp_site.arrived, 1);
        assert_eq!(projection.counts.camp_site.pending, 2);
    }

    #[rstest]
    fn team_buckets_are_fixed_to_the_known_set() {
        let roster = vec![camper("Nimal", "Wattala", "Stowaways", false, false)];

        let projection = project(&roster, &RosterFilter::default(), &known_teams());

        assert_eq!(projection.counts.by_team.len(), 4);
        assert!(!projection.counts.by_team.contains_key("Stowaways"));
        assert!(projection.counts.by_team.values().all(|count| *count == 0));
    }

    #[rstest]
    fn empty_filter_matches_everything() {
        let roster = vec![
            camper("Nimal", "Wattala", "Vikings", true, true),
            camper("Kamal", "Dematagoda", "Gladiators", false, false),
        ];

        let projection = project(&roster, &RosterFilter::default(), &known_teams());

        assert_eq!(projection.campers.len(), 2);
    }

    #[rstest]
    fn projection_is_deterministic() {
        let roster = vec![
            camper("Nimal", "Wattala", "Vikings", true, false),
            camper("Kamal", "Dematagoda", "Gladiators", false, true),
        ];
        let filter = RosterFilter {
            name_contains: Some("a".into()),
            ..RosterFilter::default()
        };

        let first = project(&roster, &filter, &known_teams());
        let second = project(&roster, &filter, &known_teams());

        assert_eq!(first, second);
    }
}
