use crate::error::{DataUnavailable, ParseDegraded, Query, SourceResult, SourceUnavailable};
use crate::normalize::{
    normalize_schedule, normalize_standings, normalize_team_stats, MergeReport, Normalized,
};
use crate::source::StatsSource;
use crate::teams::{Team, TeamDirectory};
use crate::{ScheduleEntry, StandingsRecord, TeamStatRecord};
use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use log::{error, info, warn};
use std::sync::Arc;

/// A canonical result and the provider that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Fetched<T> {
    pub value: T,
    pub served_by: &'static str,
    pub degraded: Vec<ParseDegraded>,
    pub report: MergeReport,
}

pub type FetchResult<T> = Result<Fetched<T>, DataUnavailable>;

/// Primary first, secondary only after the primary failed. An attempt fails
/// when the adapter call fails or nothing survives normalization; when both
/// fail the caller gets a `DataUnavailable` naming both.
#[derive(Clone)]
pub struct Failover {
    primary: Arc<dyn StatsSource>,
    secondary: Arc<dyn StatsSource>,
    directory: Arc<TeamDirectory>,
}

impl Failover {
    pub fn new(
        primary: Arc<dyn StatsSource>,
        secondary: Arc<dyn StatsSource>,
        directory: Arc<TeamDirectory>,
    ) -> Self {
        Self {
            primary,
            secondary,
            directory,
        }
    }

    pub async fn team_stats(&self, year: i32) -> FetchResult<Vec<TeamStatRecord>> {
        let query = Query::TeamStats { year };
        let directory = self.directory.as_ref();
        with_failover(&*self.primary, &*self.secondary, &query, |source| {
            let query = query.clone();
            async move {
                let native = source.fetch_team_stats(year).await?;
                non_empty(normalize_team_stats(&native, directory), &query)
            }
            .boxed()
        })
        .await
    }

    pub async fn standings(&self, year: i32) -> FetchResult<Vec<StandingsRecord>> {
        let query = Query::Standings { year };
        let directory = self.directory.as_ref();
        with_failover(&*self.primary, &*self.secondary, &query, |source| {
            let query = query.clone();
            async move {
                let native = source.fetch_standings(year).await?;
                non_empty(normalize_standings(&native, directory), &query)
            }
            .boxed()
        })
        .await
    }

    /// Entries come back in schedule order; scraped rows still need their
    /// dates resolved.
    pub async fn schedule(&self, year: i32, team: &Team) -> FetchResult<Vec<ScheduleEntry>> {
        let query = Query::Schedule {
            year,
            team: team.abbreviation.clone(),
        };
        let directory = self.directory.as_ref();
        with_failover(&*self.primary, &*self.secondary, &query, |source| {
            let query = query.clone();
            async move {
                let native = source.fetch_schedule(year, team).await?;
                non_empty(normalize_schedule(&native, directory), &query)
            }
            .boxed()
        })
        .await
    }
}

fn non_empty<R>(normalized: Normalized<Vec<R>>, query: &Query) -> SourceResult<Normalized<Vec<R>>> {
    if normalized.value.is_empty() {
        return Err(SourceUnavailable::Empty {
            what: format!("{query} after normalization"),
        });
    }
    Ok(normalized)
}

async fn with_failover<'a, T, F>(
    primary: &'a dyn StatsSource,
    secondary: &'a dyn StatsSource,
    query: &Query,
    attempt: F,
) -> FetchResult<T>
where
    F: Fn(&'a dyn StatsSource) -> BoxFuture<'a, SourceResult<Normalized<T>>>,
{
    let served = |normalized: Normalized<T>, source: &dyn StatsSource| Fetched {
        value: normalized.value,
        served_by: source.name(),
        degraded: normalized.degraded,
        report: normalized.report,
    };

    let primary_err = match attempt(primary).await {
        Ok(normalized) => return Ok(served(normalized, primary)),
        Err(e) => e,
    };
    warn!(
        "{query}: {} unavailable ({primary_err}); trying {}",
        primary.name(),
        secondary.name()
    );

    match attempt(secondary).await {
        Ok(normalized) => {
            info!("{query} served by {}", secondary.name());
            Ok(served(normalized, secondary))
        }
        Err(secondary_err) => {
            let err = DataUnavailable {
                query: query.clone(),
                primary: primary_err,
                secondary: secondary_err,
            };
            error!("{err}");
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{NativeRow, NativeSchedule, NativeStandings, NativeTeamStats, Provider};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const REPORT: &str = "American League East\n1 New York Yankees 10 5 0.0 1 8 2.0 3\n";

    /// Fails every call.
    #[derive(Default)]
    struct Down {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl StatsSource for Down {
        fn name(&self) -> &'static str {
            "down"
        }

        async fn fetch_team_stats(&self, _year: i32) -> SourceResult<NativeTeamStats> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(SourceUnavailable::Status {
                url: "http://down.test/stats".into(),
                status: 503,
            })
        }

        async fn fetch_standings(&self, _year: i32) -> SourceResult<NativeStandings> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(SourceUnavailable::Timeout {
                url: "http://down.test/standings".into(),
            })
        }

        async fn fetch_schedule(&self, _year: i32, team: &Team) -> SourceResult<NativeSchedule> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(SourceUnavailable::UnknownTeam {
                source_name: "down",
                team: team.name.clone(),
            })
        }
    }

    /// Serves a fixed standings report, one stat row and an empty schedule.
    struct Canned {
        calls: AtomicUsize,
        report: &'static str,
    }

    impl Canned {
        fn new(report: &'static str) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                report,
            }
        }
    }

    #[async_trait]
    impl StatsSource for Canned {
        fn name(&self) -> &'static str {
            "canned"
        }

        async fn fetch_team_stats(&self, _year: i32) -> SourceResult<NativeTeamStats> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(NativeTeamStats {
                provider: Provider::Secondary,
                batting: vec![NativeRow {
                    team_key: "Chicago Cubs".into(),
                    columns: vec![("runs".into(), 700.0)],
                }],
                pitching: vec![NativeRow {
                    team_key: "Chicago Cubs".into(),
                    columns: vec![("runs".into(), 650.0)],
                }],
            })
        }

        async fn fetch_standings(&self, _year: i32) -> SourceResult<NativeStandings> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(NativeStandings::Report(self.report.to_owned()))
        }

        async fn fetch_schedule(&self, _year: i32, _team: &Team) -> SourceResult<NativeSchedule> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(NativeSchedule::Scraped(vec![]))
        }
    }

    fn failover(primary: Arc<dyn StatsSource>, secondary: Arc<dyn StatsSource>) -> Failover {
        Failover::new(primary, secondary, Arc::new(TeamDirectory::mlb()))
    }

    #[tokio::test]
    async fn failing_primary_is_served_by_secondary() {
        let primary = Arc::new(Down::default());
        let secondary = Arc::new(Canned::new(REPORT));
        let agg = failover(primary.clone(), secondary.clone());

        let standings = agg.standings(2026).await.unwrap();
        assert_eq!(standings.served_by, "canned");
        assert_eq!(standings.value[0].team, "New York Yankees");

        let stats = agg.team_stats(2026).await.unwrap();
        assert_eq!(stats.served_by, "canned");
        assert_eq!(stats.value[0].runs, Some(700.0));
        assert_eq!(stats.value[0].runs_allowed, Some(650.0));

        assert_eq!(primary.calls.load(Ordering::SeqCst), 2);
        assert_eq!(secondary.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn healthy_primary_never_touches_secondary() {
        let primary = Arc::new(Canned::new(REPORT));
        let secondary = Arc::new(Down::default());
        let agg = failover(primary.clone(), secondary.clone());

        let standings = agg.standings(2026).await.unwrap();
        assert_eq!(standings.served_by, "canned");
        assert_eq!(secondary.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn unparseable_primary_payload_fails_over() {
        let primary = Arc::new(Canned::new("Standings are being updated\n"));
        let secondary = Arc::new(Canned::new(REPORT));
        let agg = failover(primary.clone(), secondary.clone());

        let standings = agg.standings(2026).await.unwrap();
        assert_eq!(standings.value.len(), 1);
        assert_eq!(primary.calls.load(Ordering::SeqCst), 1);
        assert_eq!(secondary.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn both_failing_names_both_causes() {
        let agg = failover(Arc::new(Down::default()), Arc::new(Canned::new(REPORT)));
        let team = TeamDirectory::mlb().by_abbreviation("CHC").cloned().unwrap();

        let err = agg.schedule(2026, &team).await.unwrap_err();
        assert_eq!(
            err.query,
            Query::Schedule {
                year: 2026,
                team: "CHC".into()
            }
        );
        assert!(matches!(err.primary, SourceUnavailable::UnknownTeam { .. }));
        assert!(matches!(err.secondary, SourceUnavailable::Empty { .. }));
    }
}
