//! Row and column model of the race results table.

use std::{cmp::Ordering, collections::BTreeSet};

use itertools::Itertools;

use crate::{
    driver::{Position, RaceResult},
    flags::FlagTable,
    position_color::PositionColor,
};

/// One table row per race, built from the driver's own result entry.
#[derive(Clone, Debug, PartialEq)]
pub struct RaceRow {
    /// Row identity, the round number
    pub key: u32,
    pub round: u32,
    pub race_name: String,
    pub circuit_country: String,
    pub flag_code: Option<String>,
    pub team: String,
    pub grid: u32,
    pub position: Position,
}

impl RaceRow {
    pub fn position_color(&self) -> PositionColor {
        PositionColor::from(&self.position)
    }
}

pub fn project_rows(races: &[RaceResult], flags: &FlagTable) -> Vec<RaceRow> {
    races
        .iter()
        .filter_map(|race| {
            // decoded races always carry an entry, skip rather than panic otherwise
            let entry = race.entry()?;
            Some(RaceRow {
                key: race.round,
                round: race.round,
                race_name: race.race_name.clone(),
                circuit_country: race.circuit_country.clone(),
                flag_code: flags.resolve(&race.circuit_country).map(str::to_string),
                team: entry.constructor_name.clone(),
                grid: entry.grid,
                position: entry.position.clone(),
            })
        })
        .collect()
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilterOption {
    pub text: String,
    pub value: String,
}

/// Filter options for the Grand Prix column, one per distinct race name in
/// first-seen order.
pub fn grand_prix_filters(races: &[RaceResult]) -> Vec<FilterOption> {
    races
        .iter()
        .map(|race| race.race_name.as_str())
        .unique()
        .map(|name| FilterOption {
            text: name.to_string(),
            value: name.to_string(),
        })
        .collect()
}

/// Options whose text contains `query`, ignoring case. An empty query keeps everything.
pub fn search_filters<'a>(filters: &'a [FilterOption], query: &str) -> Vec<&'a FilterOption> {
    let query = query.trim().to_lowercase();
    filters
        .iter()
        .filter(|option| query.is_empty() || option.text.to_lowercase().contains(&query))
        .collect()
}

pub fn matches_filter(row: &RaceRow, value: &str) -> bool {
    row.race_name.contains(value)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ColumnKey {
    Round,
    GrandPrix,
    Team,
    Grid,
    RacePosition,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ColumnDescriptor {
    pub key: ColumnKey,
    pub title: &'static str,
    pub filters: Vec<FilterOption>,
    pub filter_search: bool,
    pub sortable: bool,
    pub colorized: bool,
    /// Share of the table width, `None` sizes to content
    pub width: Option<f32>,
}

impl ColumnDescriptor {
    fn plain(key: ColumnKey, title: &'static str) -> Self {
        Self {
            key,
            title,
            filters: Vec::new(),
            filter_search: false,
            sortable: false,
            colorized: false,
            width: None,
        }
    }
}

/// Column set for the current races; filter options are regenerated on every call.
pub fn columns(races: &[RaceResult]) -> Vec<ColumnDescriptor> {
    vec![
        ColumnDescriptor::plain(ColumnKey::Round, "Round"),
        ColumnDescriptor {
            filters: grand_prix_filters(races),
            filter_search: true,
            width: Some(0.3),
            ..ColumnDescriptor::plain(ColumnKey::GrandPrix, "Grand Prix")
        },
        // one team per season, no filter needed
        ColumnDescriptor::plain(ColumnKey::Team, "Team"),
        ColumnDescriptor::plain(ColumnKey::Grid, "Grid"),
        ColumnDescriptor {
            sortable: true,
            colorized: true,
            ..ColumnDescriptor::plain(ColumnKey::RacePosition, "Race Position")
        },
    ]
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    /// Header click cycle: unsorted, ascending, descending, unsorted.
    pub fn cycle(current: Option<SortOrder>) -> Option<SortOrder> {
        match current {
            None => Some(Self::Ascending),
            Some(Self::Ascending) => Some(Self::Descending),
            Some(Self::Descending) => None,
        }
    }
}

/// Orders finishing positions numerically. Status codes always come last,
/// whatever the direction, and among themselves by code.
pub fn compare_positions(a: &Position, b: &Position, order: SortOrder) -> Ordering {
    match (a, b, order) {
        (Position::Classified(a), Position::Classified(b), SortOrder::Ascending) => a.cmp(b),
        (Position::Classified(a), Position::Classified(b), SortOrder::Descending) => b.cmp(a),
        (Position::Classified(_), Position::Status(_), _) => Ordering::Less,
        (Position::Status(_), Position::Classified(_), _) => Ordering::Greater,
        (Position::Status(a), Position::Status(b), _) => a.cmp(b),
    }
}

/// Interactive state of the table: selected filters and sort direction.
#[derive(Clone, Debug, Default)]
pub struct TableState {
    pub selected_filters: BTreeSet<String>,
    pub filter_search: String,
    pub sort: Option<SortOrder>,
}

impl TableState {
    pub fn toggle_filter(&mut self, value: &str) {
        if !self.selected_filters.remove(value) {
            self.selected_filters.insert(value.to_string());
        }
    }

    pub fn clear_filters(&mut self) {
        self.selected_filters.clear();
        self.filter_search.clear();
    }

    pub fn cycle_sort(&mut self) {
        self.sort = SortOrder::cycle(self.sort);
    }

    /// Text shown in place of an empty table body.
    pub fn empty_message(&self, rows: &[RaceRow]) -> Option<&'static str> {
        if rows.is_empty() {
            Some("No races this season")
        } else if self.visible_rows(rows).is_empty() {
            Some("No races match the selected filters")
        } else {
            None
        }
    }

    /// Rows passing any selected filter, sorted by race position if requested.
    /// Ties keep round order so repeated sorts are stable.
    pub fn visible_rows<'a>(&self, rows: &'a [RaceRow]) -> Vec<&'a RaceRow> {
        let mut visible = rows
            .iter()
            .filter(|row| {
                self.selected_filters.is_empty()
                    || self
                        .selected_filters
                        .iter()
                        .any(|value| matches_filter(row, value))
            })
            .collect_vec();

        if let Some(order) = self.sort {
            visible.sort_by(|a, b| {
                compare_positions(&a.position, &b.position, order).then(a.round.cmp(&b.round))
            });
        }
        visible
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::RaceEntry;
    use proptest::prelude::*;

    fn race(round: u32, name: &str, country: &str, grid: u32, position: Position) -> RaceResult {
        RaceResult {
            season: "2013".to_string(),
            round,
            race_name: name.to_string(),
            circuit_name: format!("{name} Circuit"),
            locality: "Town".to_string(),
            circuit_country: country.to_string(),
            date: "2013-03-17".to_string(),
            results: vec![RaceEntry {
                constructor_name: "Mercedes".to_string(),
                grid,
                position,
                points: 0.,
                laps: 58,
                status: "Finished".to_string(),
            }],
        }
    }

    fn season() -> Vec<RaceResult> {
        vec![
            race(1, "Australian Grand Prix", "Australia", 3, Position::Classified(5)),
            race(2, "Malaysian Grand Prix", "Malaysia", 4, Position::Classified(3)),
            race(3, "Chinese Grand Prix", "China", 1, Position::Status("R".to_string())),
            race(4, "Bahrain Grand Prix", "Bahrain", 9, Position::Classified(1)),
        ]
    }

    #[test]
    fn test_project_rows() {
        let rows = project_rows(&season(), &FlagTable::builtin());
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].key, 1);
        assert_eq!(rows[0].team, "Mercedes");
        assert_eq!(rows[0].grid, 3);
        assert_eq!(rows[0].flag_code.as_deref(), Some("AU"));
        assert_eq!(rows[2].position_color(), PositionColor::NonFinish);
        assert_eq!(rows[3].position_color(), PositionColor::Gold);
    }

    #[test]
    fn test_row_keys_are_unique() {
        let rows = project_rows(&season(), &FlagTable::builtin());
        let keys = rows.iter().map(|r| r.key).collect::<BTreeSet<_>>();
        assert_eq!(keys.len(), rows.len());
    }

    #[test]
    fn test_repeated_round_does_not_panic() {
        let mut races = season();
        races.push(race(4, "Spanish Grand Prix", "Spain", 2, Position::Classified(6)));
        let rows = project_rows(&races, &FlagTable::builtin());
        assert_eq!(rows.len(), 5);
    }

    #[test]
    fn test_race_without_entry_is_skipped() {
        let mut races = season();
        races[1].results.clear();
        let rows = project_rows(&races, &FlagTable::builtin());
        assert_eq!(rows.iter().map(|r| r.round).collect_vec(), vec![1, 3, 4]);
    }

    #[test]
    fn test_unknown_country_has_no_flag() {
        let races = vec![race(1, "Moon Grand Prix", "Moon", 1, Position::Classified(1))];
        let rows = project_rows(&races, &FlagTable::builtin());
        assert_eq!(rows[0].flag_code, None);
    }

    #[test]
    fn test_grand_prix_filters_one_per_race() {
        let filters = grand_prix_filters(&season());
        assert_eq!(filters.len(), 4);
        assert_eq!(filters[0].text, "Australian Grand Prix");
        assert_eq!(filters[0].value, "Australian Grand Prix");
    }

    #[test]
    fn test_grand_prix_filters_deduplicate_names() {
        let mut races = season();
        races.push(race(5, "Bahrain Grand Prix", "Bahrain", 2, Position::Classified(2)));
        let filters = grand_prix_filters(&races);
        assert_eq!(filters.len(), 4);
    }

    #[test]
    fn test_filter_matches_substring() {
        let rows = project_rows(&season(), &FlagTable::builtin());
        let mut state = TableState::default();
        state.toggle_filter("Chinese Grand Prix");
        let visible = state.visible_rows(&rows);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].round, 3);

        state.toggle_filter("Chinese Grand Prix");
        state.toggle_filter("Grand Prix");
        assert_eq!(state.visible_rows(&rows).len(), 4);
    }

    #[test]
    fn test_multiple_filters_are_combined() {
        let rows = project_rows(&season(), &FlagTable::builtin());
        let mut state = TableState::default();
        state.toggle_filter("Australian Grand Prix");
        state.toggle_filter("Bahrain Grand Prix");
        let rounds = state.visible_rows(&rows).iter().map(|r| r.round).collect_vec();
        assert_eq!(rounds, vec![1, 4]);

        state.clear_filters();
        assert_eq!(state.visible_rows(&rows).len(), 4);
    }

    #[test]
    fn test_empty_message() {
        let mut state = TableState::default();
        assert_eq!(state.empty_message(&[]), Some("No races this season"));

        let rows = project_rows(&season(), &FlagTable::builtin());
        assert_eq!(state.empty_message(&rows), None);

        state.toggle_filter("Monaco");
        assert_eq!(
            state.empty_message(&rows),
            Some("No races match the selected filters")
        );
    }

    #[test]
    fn test_search_filters() {
        let filters = grand_prix_filters(&season());
        let found = search_filters(&filters, "bah");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].text, "Bahrain Grand Prix");
        assert_eq!(search_filters(&filters, "  ").len(), 4);
    }

    #[test]
    fn test_sort_ascending_and_descending() {
        let rows = project_rows(&season(), &FlagTable::builtin());
        let mut state = TableState::default();

        state.cycle_sort();
        assert_eq!(state.sort, Some(SortOrder::Ascending));
        let rounds = state.visible_rows(&rows).iter().map(|r| r.round).collect_vec();
        assert_eq!(rounds, vec![4, 2, 1, 3]);

        state.cycle_sort();
        assert_eq!(state.sort, Some(SortOrder::Descending));
        let rounds = state.visible_rows(&rows).iter().map(|r| r.round).collect_vec();
        assert_eq!(rounds, vec![1, 2, 4, 3]);

        state.cycle_sort();
        assert_eq!(state.sort, None);
        let rounds = state.visible_rows(&rows).iter().map(|r| r.round).collect_vec();
        assert_eq!(rounds, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_columns() {
        let columns = columns(&season());
        let titles = columns.iter().map(|c| c.title).collect_vec();
        assert_eq!(
            titles,
            vec!["Round", "Grand Prix", "Team", "Grid", "Race Position"]
        );
        let grand_prix = &columns[1];
        assert_eq!(grand_prix.filters.len(), 4);
        assert!(grand_prix.filter_search);
        assert_eq!(grand_prix.width, Some(0.3));
        let position = &columns[4];
        assert!(position.sortable && position.colorized);
        assert!(columns.iter().filter(|c| c.sortable).count() == 1);
    }

    fn arb_position() -> impl Strategy<Value = Position> {
        prop_oneof![
            (1u32..=24).prop_map(Position::Classified),
            prop::sample::select(vec!["R", "D", "E", "W", "F", "N"])
                .prop_map(|code| Position::Status(code.to_string())),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_sort_is_ordered_and_idempotent(
            positions in prop::collection::vec(arb_position(), 0..24),
            descending in any::<bool>(),
        ) {
            let races = positions
                .iter()
                .enumerate()
                .map(|(i, p)| race(i as u32 + 1, &format!("Race {i}"), "UK", 1, p.clone()))
                .collect_vec();
            let rows = project_rows(&races, &FlagTable::builtin());
            let state = TableState {
                sort: Some(if descending { SortOrder::Descending } else { SortOrder::Ascending }),
                ..TableState::default()
            };

            let sorted = state.visible_rows(&rows);
            let numeric = sorted.iter().filter_map(|r| r.position.classified()).collect_vec();
            let mut expected = numeric.clone();
            expected.sort();
            if descending {
                expected.reverse();
            }
            prop_assert_eq!(numeric, expected);

            // every status code sits after every classified row
            let first_status = sorted.iter().position(|r| r.position.classified().is_none());
            if let Some(first_status) = first_status {
                prop_assert!(sorted[first_status..].iter().all(|r| r.position.classified().is_none()));
            }

            let resorted_input = sorted.iter().map(|r| (*r).clone()).collect_vec();
            let resorted = state.visible_rows(&resorted_input);
            prop_assert_eq!(
                resorted.iter().map(|r| r.key).collect_vec(),
                sorted.iter().map(|r| r.key).collect_vec()
            );
        }

        #[test]
        fn prop_filter_on_race_name_keeps_substring_matches(
            names in prop::collection::vec("[A-C]{1,3}", 1..12),
            pick in any::<prop::sample::Index>(),
        ) {
            let races = names
                .iter()
                .enumerate()
                .map(|(i, n)| race(i as u32 + 1, n, "UK", 1, Position::Classified(1)))
                .collect_vec();
            let rows = project_rows(&races, &FlagTable::builtin());
            let chosen = pick.get(&names).clone();
            let mut state = TableState::default();
            state.toggle_filter(&chosen);

            let visible = state.visible_rows(&rows);
            let expected = names.iter().filter(|n| n.contains(chosen.as_str())).count();
            prop_assert_eq!(visible.len(), expected);
            prop_assert!(visible.iter().all(|r| r.race_name.contains(chosen.as_str())));
        }
    }
}
