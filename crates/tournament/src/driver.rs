//! Tournament driver: the control loop of a double-elimination run
//!
//! One match at a time: locate a playable match, resolve its series, write
//! the result back into the bracket, update the head-to-head ledger, repeat.
//! When nothing is playable the run is finished and standings are read from
//! the bracket.

use bracket_core::{
    apply_result, next_ready_match, stage_standings, start_match, BracketBuilder, BracketStore,
    Group, InMemoryStore, MatchId, MatchReport, ParticipantId, StageId, Standing,
};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

use crate::competitor::Competitor;
use crate::config::TournamentConfig;
use crate::error::{TournamentError, TournamentResult};
use crate::game::GamePlayer;
use crate::ledger::HeadToHeadLedger;
use crate::series::{SeriesResolver, SeriesResult};
use crate::summary::TournamentSummary;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentStatus {
    Idle,
    Running,
    Finished,
}

/// How a call to [`TournamentDriver::run`] ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Finished,
    Cancelled,
}

/// Shared cancellation flag, checked between matches.
///
/// Cheap to clone; every clone observes the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag {
    cancelled: Arc<AtomicBool>,
}

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

/// Top four of a finished run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Podium {
    pub champion: Option<Competitor>,
    pub runner_up: Option<Competitor>,
    pub third_place: Option<Competitor>,
    pub fourth_place: Option<Competitor>,
}

/// A match the driver resolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayedMatch {
    pub match_id: MatchId,
    pub group: Group,
    pub round: u32,
    pub series: SeriesResult,
}

/// Drives one tournament over one bracket stage
pub struct TournamentDriver<P: GamePlayer, S: BracketStore = InMemoryStore> {
    config: TournamentConfig,
    player: P,
    store: S,
    resolver: SeriesResolver,
    status: TournamentStatus,
    stage_id: Option<StageId>,
    competitors: HashMap<ParticipantId, Competitor>,
    participant_ids: HashMap<String, ParticipantId>,
    ledger: HeadToHeadLedger,
    history: Vec<PlayedMatch>,
    standings: Vec<Standing>,
    podium: Podium,
}

impl<P: GamePlayer> TournamentDriver<P, InMemoryStore> {
    pub fn new(config: TournamentConfig, player: P) -> Self {
        Self::with_store(config, player, InMemoryStore::new())
    }
}

impl<P: GamePlayer, S: BracketStore> TournamentDriver<P, S> {
    pub fn with_store(config: TournamentConfig, player: P, store: S) -> Self {
        let resolver = SeriesResolver::new(config.time_limit());
        Self {
            config,
            player,
            store,
            resolver,
            status: TournamentStatus::Idle,
            stage_id: None,
            competitors: HashMap::new(),
            participant_ids: HashMap::new(),
            ledger: HeadToHeadLedger::new(),
            history: Vec::new(),
            standings: Vec::new(),
            podium: Podium::default(),
        }
    }

    /// Shuffle the field with the configured seed and build the bracket
    pub fn start(&mut self, competitors: Vec<Competitor>) -> TournamentResult<StageId> {
        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        self.start_with_rng(competitors, &mut rng)
    }

    /// Shuffle the field with `rng`, build the bracket and move to running
    pub fn start_with_rng<R: Rng + ?Sized>(
        &mut self,
        mut competitors: Vec<Competitor>,
        rng: &mut R,
    ) -> TournamentResult<StageId> {
        self.expect_status(TournamentStatus::Idle)?;

        competitors.shuffle(rng);
        let names: Vec<String> = competitors.iter().map(|c| c.name.clone()).collect();
        let bracket = BracketBuilder::new(self.config.stage_settings())
            .name(self.config.name.clone())
            .build(&names)?;
        let stage_id = self.store.create_stage(bracket)?;

        for participant in self.store.select_participants(stage_id) {
            if let Some(competitor) = competitors.iter().find(|c| c.name == participant.name) {
                self.participant_ids
                    .insert(competitor.name.clone(), participant.id);
                self.competitors.insert(participant.id, competitor.clone());
            }
        }

        self.stage_id = Some(stage_id);
        self.status = TournamentStatus::Running;
        info!(
            tournament = %self.config.name,
            competitors = competitors.len(),
            "tournament started"
        );
        Ok(stage_id)
    }

    /// Resolve a single match.
    ///
    /// Returns `None` once no match is playable; the run is then finished and
    /// standings are available. A series that aborts leaves the run running.
    pub fn step(&mut self) -> TournamentResult<Option<PlayedMatch>> {
        if self.status == TournamentStatus::Finished {
            return Ok(None);
        }
        self.expect_status(TournamentStatus::Running)?;
        let stage_id = self.current_stage()?;

        let Some(record) = next_ready_match(&self.store, stage_id)? else {
            self.finish(stage_id)?;
            return Ok(None);
        };
        let Some((first_id, second_id)) = record.participants() else {
            return Err(bracket_core::BracketError::MatchNotReady(record.id).into());
        };
        let first = self.competitor(first_id)?.clone();
        let second = self.competitor(second_id)?.clone();

        start_match(&mut self.store, stage_id, record.id)?;
        info!(match_id = record.id, group = ?record.group, round = record.round, "{} vs {}", first, second);

        let series = match self.resolver.resolve(&mut self.player, &first, &second) {
            Ok(series) => series,
            Err(e) => {
                warn!(match_id = record.id, error = %e, "match aborted");
                return Err(e);
            }
        };

        let report = MatchReport {
            winner: self.participant_id(&series.winner)?,
            loser: self.participant_id(&series.loser)?,
            winner_score: series.winner_score(),
            loser_score: series.loser_score(),
        };
        apply_result(&mut self.store, stage_id, record.id, &report)?;
        self.ledger.record(&series.winner.name, &series.loser.name);

        info!(
            match_id = record.id,
            winner = %series.winner,
            score = %format!("{}-{}", report.winner_score, report.loser_score),
            decision = ?series.decision,
            "match completed"
        );

        let played = PlayedMatch {
            match_id: record.id,
            group: record.group,
            round: record.round,
            series,
        };
        self.history.push(played.clone());
        Ok(Some(played))
    }

    /// Play matches until the bracket is finished or `cancel` is raised.
    ///
    /// Cancellation is checked only between matches.
    pub fn run(&mut self, cancel: &CancelFlag) -> TournamentResult<RunOutcome> {
        loop {
            if cancel.is_cancelled() {
                warn!(played = self.history.len(), "tournament cancelled");
                return Ok(RunOutcome::Cancelled);
            }
            if self.step()?.is_none() {
                return Ok(RunOutcome::Finished);
            }
        }
    }

    fn finish(&mut self, stage_id: StageId) -> TournamentResult<()> {
        self.standings = stage_standings(&self.store, stage_id)?;
        let place = |rank_index: usize| {
            self.standings
                .get(rank_index)
                .and_then(|s| self.competitors.get(&s.participant_id))
                .cloned()
        };
        self.podium = Podium {
            champion: place(0),
            runner_up: place(1),
            third_place: place(2),
            fourth_place: place(3),
        };
        self.status = TournamentStatus::Finished;

        info!(
            champion = self.podium.champion.as_ref().map(|c| c.name.as_str()).unwrap_or("-"),
            matches = self.history.len(),
            "tournament finished"
        );
        Ok(())
    }

    fn expect_status(&self, expected: TournamentStatus) -> TournamentResult<()> {
        if self.status != expected {
            return Err(TournamentError::InvalidState {
                expected,
                found: self.status,
            });
        }
        Ok(())
    }

    fn current_stage(&self) -> TournamentResult<StageId> {
        self.stage_id.ok_or(TournamentError::InvalidState {
            expected: TournamentStatus::Running,
            found: self.status,
        })
    }

    fn competitor(&self, id: ParticipantId) -> TournamentResult<&Competitor> {
        self.competitors
            .get(&id)
            .ok_or(TournamentError::UnknownParticipant(id))
    }

    fn participant_id(&self, competitor: &Competitor) -> TournamentResult<ParticipantId> {
        self.participant_ids
            .get(&competitor.name)
            .copied()
            .ok_or_else(|| {
                TournamentError::Bracket(bracket_core::BracketError::Configuration(format!(
                    "competitor '{}' is not seated in the bracket",
                    competitor.name
                )))
            })
    }

    pub fn status(&self) -> TournamentStatus {
        self.status
    }

    pub fn stage_id(&self) -> Option<StageId> {
        self.stage_id
    }

    pub fn config(&self) -> &TournamentConfig {
        &self.config
    }

    pub fn ledger(&self) -> &HeadToHeadLedger {
        &self.ledger
    }

    pub fn history(&self) -> &[PlayedMatch] {
        &self.history
    }

    pub fn standings(&self) -> &[Standing] {
        &self.standings
    }

    pub fn podium(&self) -> &Podium {
        &self.podium
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn player_mut(&mut self) -> &mut P {
        &mut self.player
    }

    /// Read-only snapshot for reporting
    pub fn summary(&self) -> TournamentResult<TournamentSummary> {
        let bracket = match self.stage_id {
            Some(stage_id) => Some(self.store.load_bracket(stage_id)?),
            None => None,
        };
        Ok(TournamentSummary::new(
            &self.config.name,
            self.status,
            bracket.as_ref(),
            &self.ledger,
            &self.standings,
            &self.podium,
            &self.history,
        ))
    }
}
