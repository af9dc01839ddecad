use anyhow::{Context, Result};
use log::{error, info, warn};

use crate::browser::{BrowserSession, with_session};
use crate::config::AppConfig;
use crate::database::{self, DbPool, Tournament, TournamentPlayer, sink};
use crate::domain::{BatchTally, ProfileInfo};
use crate::errors::{ScrapeError, lookup_context, storage_context};
use crate::rate_limiter::RateLimiter;
use crate::report;
use crate::sources::{Extraction, Query, SourceKind};

/// Refreshes stored players' ratings and expiration dates from their profiles
pub struct RefreshService {
    config: AppConfig,
    pool: DbPool,
}

enum RecordResult {
    Updated(ProfileInfo),
    NoData,
}

/// Fetches one member's profile during a batch
trait ProfileLookup {
    async fn lookup(&self, member_id: &str) -> Result<ProfileInfo, ScrapeError>;
}

/// Profile lookups through a live browser session
struct SessionLookup<'a> {
    session: &'a BrowserSession,
    config: &'a AppConfig,
}

impl ProfileLookup for SessionLookup<'_> {
    async fn lookup(&self, member_id: &str) -> Result<ProfileInfo, ScrapeError> {
        let query = Query::Member(member_id.to_string());
        match SourceKind::ProfilePage.extract(self.session, self.config, &query).await? {
            Extraction::Profile(profile) => Ok(profile),
            other => Err(ScrapeError::ParseFailure(format!("profile page result, got {:?}", other))),
        }
    }
}

impl RefreshService {
    pub fn new(config: AppConfig) -> Result<Self> {
        let pool = database::create_pool(&config.storage.database_path)?;
        Self::with_pool(config, pool)
    }

    /// Use an already opened pool; the schema is created if missing
    pub fn with_pool(config: AppConfig, pool: DbPool) -> Result<Self> {
        let mut conn = database::get_connection(&pool)?;
        database::setup::ensure_schema(&mut conn)?;
        drop(conn);

        Ok(Self { config, pool })
    }

    /// Refresh every player with a member id
    pub async fn run_all(&self) -> Result<BatchTally> {
        let players = {
            let mut conn = database::get_connection(&self.pool)?;
            database::players::list_with_member_ids(&mut conn)?
        };

        if players.is_empty() {
            info!("No players with USCF IDs found in the database.");
            return Ok(BatchTally::default());
        }
        info!("Found {} players with USCF IDs. Starting lookup process...", players.len());

        let tally = with_session(&self.config.browser, |session| async move {
            let lookup = SessionLookup {
                session: session.as_ref(),
                config: &self.config,
            };
            let mut limiter = RateLimiter::new(self.config.batch.record_delay_ms);
            Ok::<_, anyhow::Error>(self.refresh_players(&lookup, &mut limiter, &players).await)
        })
        .await?;

        report::print_summary("Summary", &tally, None);
        Ok(tally)
    }

    /// Refresh players tournament by tournament, newest tournament first
    pub async fn run_tournaments(&self) -> Result<BatchTally> {
        let tournaments = {
            let mut conn = database::get_connection(&self.pool)?;
            database::tournaments::list_all(&mut conn)?
        };

        if tournaments.is_empty() {
            info!("No tournaments found in the database.");
            return Ok(BatchTally::default());
        }
        info!("Found {} tournaments. Starting lookup process...", tournaments.len());

        let list = tournaments.as_slice();
        let overall = with_session(&self.config.browser, |session| async move {
            let lookup = SessionLookup {
                session: session.as_ref(),
                config: &self.config,
            };
            self.refresh_tournaments(&lookup, list).await
        })
        .await?;

        report::print_summary("OVERALL SUMMARY", &overall, Some(tournaments.len()));
        Ok(overall)
    }

    async fn refresh_tournaments<L: ProfileLookup>(&self, lookup: &L, tournaments: &[Tournament]) -> Result<BatchTally> {
        let mut limiter = RateLimiter::new(self.config.batch.record_delay_ms);
        let mut overall = BatchTally::default();

        for tournament in tournaments {
            report::print_banner(&format!("TOURNAMENT: {}", tournament.name));
            println!("Status: {}", tournament.status.as_deref().unwrap_or("unknown"));

            let players = {
                let mut conn = database::get_connection(&self.pool)?;
                database::players::list_by_tournament(&mut conn, tournament.id)?
            };

            if players.is_empty() {
                println!("No players with USCF IDs found in this tournament.");
                continue;
            }
            println!("Found {} players with USCF IDs in this tournament.", players.len());

            let tally = self.refresh_players(lookup, &mut limiter, &players).await;
            report::print_summary("Tournament Summary", &tally, None);
            overall.absorb(&tally);
        }

        Ok(overall)
    }

    /// One lookup per player; a failed record is counted and the batch moves on
    async fn refresh_players<L: ProfileLookup>(
        &self,
        lookup: &L,
        limiter: &mut RateLimiter,
        players: &[TournamentPlayer],
    ) -> BatchTally {
        let mut tally = BatchTally::new(players.len());

        for (idx, player) in players.iter().enumerate() {
            limiter.wait().await;
            print_player_header(idx + 1, players.len(), player);

            match self.refresh_one(lookup, player).await {
                Ok(RecordResult::Updated(profile)) => {
                    report::print_record_success(&profile);
                    tally.record_success();
                }
                Ok(RecordResult::NoData) => {
                    report::print_record_failure("Failed to retrieve information from USCF");
                    tally.record_failure();
                }
                Err(e) => {
                    error!("{:#}", e);
                    report::print_record_failure(&format!("Error processing {}: {:#}", player.name, e));
                    tally.record_failure();
                }
            }
        }

        tally
    }

    async fn refresh_one<L: ProfileLookup>(&self, lookup: &L, player: &TournamentPlayer) -> Result<RecordResult> {
        let profile = lookup
            .lookup(&player.uscf_id)
            .await
            .with_context(|| lookup_context(&player.uscf_id))?;

        if profile.is_empty() {
            warn!("No rating or expiration date for member {}", player.uscf_id);
            return Ok(RecordResult::NoData);
        }

        let mut conn = database::get_connection(&self.pool)?;
        let rating = profile.has_rating().then_some(profile.rating.as_str());
        sink::record_lookup(&mut conn, player.id, rating, profile.expiration_date.as_deref())
            .with_context(|| storage_context("update", "players"))?;

        Ok(RecordResult::Updated(profile))
    }
}

fn print_player_header(position: usize, total: usize, player: &TournamentPlayer) {
    println!("\n[{}/{}] {}", position, total, player.name);
    println!("  USCF ID: {}", player.uscf_id);
    if let Some(section) = &player.section {
        println!("  Section: {}", section);
    }
    if let Some(status) = &player.status {
        println!("  Status: {}", status);
    }
    if let Some(rating) = player.rating {
        println!("  Current Rating: {}", rating);
    }
}
