//! Metrics Engine: derived views over a ledger snapshot.
//!
//! Every function here is pure. Snapshots are in insertion order, oldest
//! first, and an empty snapshot yields each view's zero value.

use chrono::NaiveDate;

use super::calendar::{MonthlyCalendar, YearMonth};
use super::trade::{SetupTag, Tag, TradeRecord};

pub use super::synthetic::{time_of_day_buckets, TimeBucket, DEFAULT_TIME_BUCKET_LABELS};

pub const DEFAULT_STREAK_WINDOW: usize = 3;
pub const DEFAULT_EQUITY_WINDOW: usize = 30;

/// The trade recorded for `today`, first match if several share the date.
pub fn todays_snapshot(snapshot: &[TradeRecord], today: NaiveDate) -> Option<&TradeRecord> {
    snapshot.iter().find(|r| r.date == today)
}

/// Length of the last `window` records if none of them lost, else 0. With
/// fewer than `window` records every record has to be non-losing.
pub fn recent_win_streak(snapshot: &[TradeRecord], window: usize) -> usize {
    let recent = last_n(snapshot, window);
    if recent.iter().all(TradeRecord::is_win) {
        recent.len()
    } else {
        0
    }
}

pub fn monthly_calendar(snapshot: &[TradeRecord], month: YearMonth) -> MonthlyCalendar {
    MonthlyCalendar::build(snapshot, month)
}

/// Per-tag win rate (percent) and average P/L, aligned with `tags`.
#[derive(Debug, Clone, PartialEq)]
pub struct TagAggregate {
    pub tags: Vec<Tag>,
    pub win_rates: Vec<f64>,
    pub avg_pls: Vec<f64>,
}

/// The fixed setups in radar order.
pub fn default_tag_set() -> Vec<Tag> {
    SetupTag::ALL.into_iter().map(Tag::Setup).collect()
}

pub fn per_tag_aggregate(snapshot: &[TradeRecord], tags: &[Tag]) -> TagAggregate {
    let mut win_rates = Vec::with_capacity(tags.len());
    let mut avg_pls = Vec::with_capacity(tags.len());

    for tag in tags {
        let mut total = 0usize;
        let mut wins = 0usize;
        let mut total_pl = 0.0_f64;
        for record in snapshot.iter().filter(|r| &r.tag == tag) {
            total += 1;
            total_pl += record.pl;
            if record.is_win() {
                wins += 1;
            }
        }

        if total == 0 {
            win_rates.push(0.0);
            avg_pls.push(0.0);
        } else {
            win_rates.push(wins as f64 / total as f64 * 100.0);
            avg_pls.push(total_pl / total as f64);
        }
    }

    TagAggregate {
        tags: tags.to_vec(),
        win_rates,
        avg_pls,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EquityPoint {
    pub date: NaiveDate,
    /// `MM/DD` axis label.
    pub label: String,
    pub cumulative: f64,
}

/// Running P/L over the last `window` records.
pub fn equity_curve(snapshot: &[TradeRecord], window: usize) -> Vec<EquityPoint> {
    let mut cumulative = 0.0_f64;
    last_n(snapshot, window)
        .iter()
        .map(|record| {
            cumulative += record.pl;
            EquityPoint {
                date: record.date,
                label: record.short_date(),
                cumulative,
            }
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MentalPoint {
    pub ordinal: u8,
    pub pl: f64,
}

pub fn mental_vs_pl(snapshot: &[TradeRecord]) -> Vec<MentalPoint> {
    snapshot
        .iter()
        .map(|r| MentalPoint {
            ordinal: r.mental_state.ordinal(),
            pl: r.pl,
        })
        .collect()
}

/// Newest first, as the history view lists trades.
pub fn history(snapshot: &[TradeRecord]) -> impl Iterator<Item = &TradeRecord> {
    snapshot.iter().rev()
}

/// Whole-ledger totals shown alongside the analyses.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerSummary {
    pub total_trades: usize,
    pub wins: usize,
    pub losses: usize,
    pub win_rate: f64,
    pub total_pl: f64,
    pub avg_pl: f64,
    pub largest_win: f64,
    pub largest_loss: f64,
}

impl LedgerSummary {
    pub fn compute(snapshot: &[TradeRecord]) -> Self {
        let mut wins = 0usize;
        let mut losses = 0usize;
        let mut total_pl = 0.0_f64;
        let mut largest_win = 0.0_f64;
        let mut largest_loss = 0.0_f64;

        for record in snapshot {
            let pl = record.pl;
            total_pl += pl;
            if record.is_win() {
                wins += 1;
                if pl > largest_win {
                    largest_win = pl;
                }
            } else {
                losses += 1;
                if pl.abs() > largest_loss {
                    largest_loss = pl.abs();
                }
            }
        }

        let total_trades = snapshot.len();
        let (win_rate, avg_pl) = if total_trades > 0 {
            (
                wins as f64 / total_trades as f64 * 100.0,
                total_pl / total_trades as f64,
            )
        } else {
            (0.0, 0.0)
        };

        LedgerSummary {
            total_trades,
            wins,
            losses,
            win_rate,
            total_pl,
            avg_pl,
            largest_win,
            largest_loss,
        }
    }
}

fn last_n(snapshot: &[TradeRecord], n: usize) -> &[TradeRecord] {
    &snapshot[snapshot.len().saturating_sub(n)..]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::calendar::DayOutcome;
    use crate::domain::trade::{Direction, MentalState, RiskReward};
    use approx::assert_relative_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn make_trade(id: i64, day: NaiveDate, pl: f64, tag: Tag, mental: MentalState) -> TradeRecord {
        TradeRecord {
            id,
            date: day,
            direction: Direction::Long,
            entry: 18000.0,
            exit: 18000.0 + pl / 2.0,
            pl,
            rr: RiskReward::new((pl / 20.0).abs()),
            duration_minutes: 10,
            mental_state: mental,
            tag,
            lesson: String::new(),
            screenshot: None,
        }
    }

    fn trades_with_pl(pls: &[f64]) -> Vec<TradeRecord> {
        pls.iter()
            .enumerate()
            .map(|(i, &pl)| {
                make_trade(
                    i as i64 + 1,
                    date(2024, 6, 1) + chrono::Duration::days(i as i64),
                    pl,
                    Tag::Setup(SetupTag::GapFill),
                    MentalState::Neutral,
                )
            })
            .collect()
    }

    #[test]
    fn todays_snapshot_first_match() {
        let mut trades = trades_with_pl(&[1.0, 2.0]);
        trades.push(make_trade(
            3,
            date(2024, 6, 2),
            9.0,
            Tag::Setup(SetupTag::GapFill),
            MentalState::Happy,
        ));
        assert_eq!(todays_snapshot(&trades, date(2024, 6, 2)).unwrap().id, 2);
        assert!(todays_snapshot(&trades, date(2024, 7, 1)).is_none());
        assert!(todays_snapshot(&[], date(2024, 7, 1)).is_none());
    }

    #[test]
    fn streak_all_winning() {
        assert_eq!(recent_win_streak(&trades_with_pl(&[1.0, 2.0, 3.0]), 3), 3);
    }

    #[test]
    fn streak_broken_by_loss() {
        assert_eq!(recent_win_streak(&trades_with_pl(&[1.0, -1.0, 2.0]), 3), 0);
    }

    #[test]
    fn streak_fewer_than_window() {
        assert_eq!(recent_win_streak(&trades_with_pl(&[5.0]), 3), 1);
    }

    #[test]
    fn streak_only_looks_at_window() {
        assert_eq!(recent_win_streak(&trades_with_pl(&[-4.0, 1.0, 0.0, 2.0]), 3), 3);
    }

    #[test]
    fn streak_empty() {
        assert_eq!(recent_win_streak(&[], 3), 0);
    }

    #[test]
    fn calendar_places_pl_on_day() {
        let trades = vec![
            make_trade(1, date(2024, 6, 15), -25.0, Tag::Setup(SetupTag::GapFill), MentalState::Neutral),
            make_trade(2, date(2024, 5, 15), 40.0, Tag::Setup(SetupTag::GapFill), MentalState::Neutral),
        ];
        let cal = monthly_calendar(&trades, YearMonth::new(2024, 6).unwrap());
        let values = cal.values();
        assert_eq!(values[14], -25.0);
        for (i, v) in values.iter().enumerate() {
            if i != 14 {
                assert_eq!(*v, 0.0);
            }
        }
        assert_eq!(cal.slots[14], Some(-25.0));
        assert_eq!(cal.slots[13], None);
        assert_eq!(cal.outcomes()[14], DayOutcome::Loss);
    }

    #[test]
    fn calendar_later_trade_overwrites_day() {
        let trades = vec![
            make_trade(1, date(2024, 6, 3), -10.0, Tag::Setup(SetupTag::GapFill), MentalState::Neutral),
            make_trade(2, date(2024, 6, 3), 0.0, Tag::Setup(SetupTag::GapFill), MentalState::Neutral),
        ];
        let cal = monthly_calendar(&trades, YearMonth::new(2024, 6).unwrap());
        assert_eq!(cal.slots[2], Some(0.0));
        assert_eq!(cal.outcomes()[2], DayOutcome::Win);
    }

    #[test]
    fn calendar_day_31() {
        let trades = vec![make_trade(
            1,
            date(2024, 1, 31),
            12.0,
            Tag::Setup(SetupTag::GapFill),
            MentalState::Neutral,
        )];
        let cal = monthly_calendar(&trades, YearMonth::new(2024, 1).unwrap());
        assert_eq!(cal.slots[30], Some(12.0));
    }

    #[test]
    fn tag_aggregate_gap_fill() {
        let trades = trades_with_pl(&[10.0, -10.0]);
        let agg = per_tag_aggregate(&trades, &default_tag_set());

        assert_eq!(agg.tags.len(), 4);
        let gap = agg
            .tags
            .iter()
            .position(|t| *t == Tag::Setup(SetupTag::GapFill))
            .unwrap();
        assert_relative_eq!(agg.win_rates[gap], 50.0);
        assert_relative_eq!(agg.avg_pls[gap], 0.0);
        for i in (0..4).filter(|&i| i != gap) {
            assert_eq!(agg.win_rates[i], 0.0);
            assert_eq!(agg.avg_pls[i], 0.0);
        }
    }

    #[test]
    fn tag_aggregate_custom_tags() {
        let trades = vec![
            make_trade(1, date(2024, 6, 3), 30.0, Tag::Custom("ORB".into()), MentalState::Neutral),
            make_trade(2, date(2024, 6, 4), 0.0, Tag::Custom("ORB".into()), MentalState::Neutral),
            make_trade(3, date(2024, 6, 5), -6.0, Tag::Custom("ORB".into()), MentalState::Neutral),
        ];
        let agg = per_tag_aggregate(&trades, &[Tag::Custom("ORB".into())]);
        assert_relative_eq!(agg.win_rates[0], 200.0 / 3.0, epsilon = 1e-9);
        assert_relative_eq!(agg.avg_pls[0], 8.0);
    }

    #[test]
    fn equity_curve_cumulates() {
        let curve = equity_curve(&trades_with_pl(&[5.0, -2.0, 3.0]), 30);
        let values: Vec<f64> = curve.iter().map(|p| p.cumulative).collect();
        assert_eq!(values, vec![5.0, 3.0, 6.0]);
        assert_eq!(curve[0].label, "06/01");
        assert_eq!(curve[2].date, date(2024, 6, 3));
    }

    #[test]
    fn equity_curve_uses_window() {
        let curve = equity_curve(&trades_with_pl(&[100.0, 5.0, -2.0, 3.0]), 3);
        let values: Vec<f64> = curve.iter().map(|p| p.cumulative).collect();
        assert_eq!(values, vec![5.0, 3.0, 6.0]);
    }

    #[test]
    fn mental_pairs_follow_ordinals() {
        let trades = vec![
            make_trade(1, date(2024, 6, 3), -8.0, Tag::Setup(SetupTag::GapFill), MentalState::Angry),
            make_trade(2, date(2024, 6, 4), 14.0, Tag::Setup(SetupTag::GapFill), MentalState::Happy),
        ];
        assert_eq!(
            mental_vs_pl(&trades),
            vec![
                MentalPoint { ordinal: 1, pl: -8.0 },
                MentalPoint { ordinal: 5, pl: 14.0 },
            ]
        );
    }

    #[test]
    fn history_is_newest_first() {
        let trades = trades_with_pl(&[1.0, 2.0, 3.0]);
        let ids: Vec<i64> = history(&trades).map(|r| r.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[test]
    fn summary_counts_breakeven_as_win() {
        let summary = LedgerSummary::compute(&trades_with_pl(&[10.0, 0.0, -30.0, 20.0]));
        assert_eq!(summary.total_trades, 4);
        assert_eq!(summary.wins, 3);
        assert_eq!(summary.losses, 1);
        assert_relative_eq!(summary.win_rate, 75.0);
        assert_relative_eq!(summary.total_pl, 0.0);
        assert_relative_eq!(summary.largest_win, 20.0);
        assert_relative_eq!(summary.largest_loss, 30.0);
    }

    #[test]
    fn empty_snapshot_defaults() {
        let summary = LedgerSummary::compute(&[]);
        assert_eq!(summary.total_trades, 0);
        assert_eq!(summary.win_rate, 0.0);
        assert_eq!(summary.avg_pl, 0.0);
        assert!(equity_curve(&[], 30).is_empty());
        assert!(mental_vs_pl(&[]).is_empty());
        let agg = per_tag_aggregate(&[], &default_tag_set());
        assert!(agg.win_rates.iter().all(|v| *v == 0.0));
        assert!(agg.avg_pls.iter().all(|v| *v == 0.0));
    }
}
