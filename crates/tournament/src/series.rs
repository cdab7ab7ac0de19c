//! Best-of-three series between two competitors
//!
//! Colors: the series' first competitor has white in games 1 and 2. If a
//! third game is needed the loser of game 2 takes white; after a drawn game 2
//! colors stay as they were.
//!
//! Draws count for nobody but still use up a game number. Two wins before
//! game 3 end the series; a decisive game 3 ends it outright. A drawn game 3
//! goes to the competitor with the lower total move time over the whole
//! series, then to the winner of game 2, then to the series' first competitor.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::time::Duration;
use tracing::debug;

use crate::competitor::Competitor;
use crate::error::{TournamentError, TournamentResult};
use crate::game::{Color, GamePlayer, GameReason};

/// Games needed to take a series outright
pub const WINS_NEEDED: u32 = 2;

/// Result of one game inside a series
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameResult {
    /// 1-based game number within the series
    pub number: u8,
    pub white: String,
    pub black: String,
    /// `None` for draws
    pub winner: Option<String>,
    pub loser: Option<String>,
    pub reason: GameReason,
    pub white_time: Duration,
    pub black_time: Duration,
}

/// How the series winner was determined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesDecision {
    /// Won on the board
    Games,
    /// Game 3 drawn, lower total move time
    TimeTiebreak,
    /// Game 3 drawn, equal time, winner of game 2
    GameTwoFallback,
    /// Game 3 drawn, equal time, game 2 drawn too
    SeriesWhiteFallback,
}

/// Outcome of a whole series
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesResult {
    pub winner: Competitor,
    pub loser: Competitor,
    pub games: Vec<GameResult>,
    pub decision: SeriesDecision,
    /// Total move time of the winner across the series
    pub winner_time: Duration,
    /// Total move time of the loser across the series
    pub loser_time: Duration,
}

impl SeriesResult {
    /// Games won by the series winner
    pub fn winner_score(&self) -> u32 {
        self.games_won_by(&self.winner)
    }

    /// Games won by the series loser
    pub fn loser_score(&self) -> u32 {
        self.games_won_by(&self.loser)
    }

    fn games_won_by(&self, competitor: &Competitor) -> u32 {
        self.games
            .iter()
            .filter(|g| g.winner.as_deref() == Some(competitor.name.as_str()))
            .count() as u32
    }
}

/// Plays best-of-three series through a [`GamePlayer`]
#[derive(Debug, Clone)]
pub struct SeriesResolver {
    time_limit: Duration,
}

impl SeriesResolver {
    pub fn new(time_limit: Duration) -> Self {
        Self { time_limit }
    }

    pub fn time_limit(&self) -> Duration {
        self.time_limit
    }

    /// Resolve a series between `first` and `second`.
    ///
    /// `first` plays white in games 1 and 2. A game the player cannot finish
    /// aborts the series with [`TournamentError::MatchAborted`].
    pub fn resolve(
        &self,
        player: &mut dyn GamePlayer,
        first: &Competitor,
        second: &Competitor,
    ) -> TournamentResult<SeriesResult> {
        let mut series = Series::new(first, second);
        let mut game_two_winner = None;

        for number in 1..=2u8 {
            if let Some(winner) = series.play(self, player, number, first, second)? {
                if number == 2 {
                    game_two_winner = Some(winner);
                }
                if series.wins_of(winner) == WINS_NEEDED {
                    return Ok(series.finish(winner, SeriesDecision::Games));
                }
            }
        }

        let (white, black) = match game_two_winner {
            Some(winner) if winner == first => (second, first),
            _ => (first, second),
        };
        if let Some(winner) = series.play(self, player, 3, white, black)? {
            return Ok(series.finish(winner, SeriesDecision::Games));
        }

        let (winner, decision) = match series.first_time.cmp(&series.second_time) {
            Ordering::Less => (first, SeriesDecision::TimeTiebreak),
            Ordering::Greater => (second, SeriesDecision::TimeTiebreak),
            Ordering::Equal => match game_two_winner {
                Some(winner) => (winner, SeriesDecision::GameTwoFallback),
                None => (first, SeriesDecision::SeriesWhiteFallback),
            },
        };
        Ok(series.finish(winner, decision))
    }
}

/// Running tally of a series in progress
struct Series<'a> {
    first: &'a Competitor,
    second: &'a Competitor,
    first_wins: u32,
    second_wins: u32,
    first_time: Duration,
    second_time: Duration,
    games: Vec<GameResult>,
}

impl<'a> Series<'a> {
    fn new(first: &'a Competitor, second: &'a Competitor) -> Self {
        Self {
            first,
            second,
            first_wins: 0,
            second_wins: 0,
            first_time: Duration::ZERO,
            second_time: Duration::ZERO,
            games: Vec::with_capacity(3),
        }
    }

    fn wins_of(&self, competitor: &Competitor) -> u32 {
        if competitor == self.first {
            self.first_wins
        } else {
            self.second_wins
        }
    }

    /// Play one game and record it. Returns the decisive winner, if any.
    fn play(
        &mut self,
        resolver: &SeriesResolver,
        player: &mut dyn GamePlayer,
        number: u8,
        white: &'a Competitor,
        black: &'a Competitor,
    ) -> TournamentResult<Option<&'a Competitor>> {
        let aborted = |reason: String| TournamentError::MatchAborted {
            white: white.name.clone(),
            black: black.name.clone(),
            game: number,
            reason,
        };

        let played = player
            .play_game(white, black, resolver.time_limit)
            .map_err(|e| aborted(e.to_string()))?;
        let outcome = played
            .outcome
            .ok_or_else(|| aborted("game ended without a terminal result".to_string()))?;

        let white_time = played.time_spent(Color::White);
        let black_time = played.time_spent(Color::Black);
        if white == self.first {
            self.first_time += white_time;
            self.second_time += black_time;
        } else {
            self.first_time += black_time;
            self.second_time += white_time;
        }

        let winner = outcome.winner().map(|color| match color {
            Color::White => white,
            Color::Black => black,
        });
        let loser = winner.map(|w| if w == white { black } else { white });
        if let Some(w) = winner {
            if w == self.first {
                self.first_wins += 1;
            } else {
                self.second_wins += 1;
            }
        }

        debug!(
            game = number,
            white = %white,
            black = %black,
            reason = outcome.reason().label(),
            winner = winner.map(|w| w.name.as_str()).unwrap_or("-"),
            "game finished"
        );

        self.games.push(GameResult {
            number,
            white: white.name.clone(),
            black: black.name.clone(),
            winner: winner.map(|w| w.name.clone()),
            loser: loser.map(|l| l.name.clone()),
            reason: outcome.reason(),
            white_time,
            black_time,
        });
        Ok(winner)
    }

    fn finish(self, winner: &Competitor, decision: SeriesDecision) -> SeriesResult {
        let (loser, winner_time, loser_time) = if winner == self.first {
            (self.second, self.first_time, self.second_time)
        } else {
            (self.first, self.second_time, self.first_time)
        };
        SeriesResult {
            winner: winner.clone(),
            loser: loser.clone(),
            games: self.games,
            decision,
            winner_time,
            loser_time,
        }
    }
}

#[cfg(test)]
#[path = "series_tests.rs"]
mod series_tests;
