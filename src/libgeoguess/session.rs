use crate::libgeoguess::deck::{QuizDeck, QuizItem};
use crate::libgeoguess::error::QuizError;
use crate::libgeoguess::options::{self, OptionSet};
use log::{debug, info, warn};
use rand::Rng;
use std::mem;

/// Input from whatever drives the game: buttons, typed commands or tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Start,
    Select(String),
    Advance,
    StopEarly,
    Restart,
    Exit,
}

impl Event {
    pub fn name(&self) -> &'static str {
        match self {
            Event::Start => "start",
            Event::Select(_) => "select",
            Event::Advance => "advance",
            Event::StopEarly => "stop",
            Event::Restart => "restart",
            Event::Exit => "exit",
        }
    }
}

/// One dealt item together with the deck it came from.
#[derive(Debug, Clone)]
pub struct Round {
    deck: QuizDeck,
    item: QuizItem,
    options: OptionSet,
}

impl Round {
    pub fn item(&self) -> &QuizItem {
        &self.item
    }

    pub fn options(&self) -> &OptionSet {
        &self.options
    }

    /// 1-based.
    pub fn number(&self) -> usize {
        self.deck.position() + 1
    }

    pub fn total(&self) -> usize {
        self.deck.len()
    }

    pub fn score(&self) -> usize {
        self.deck.final_score()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub selected: String,
    pub correct: bool,
    pub correct_label: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub score: usize,
    pub answered: usize,
    pub total: usize,
    pub stopped_early: bool,
}

impl Summary {
    fn new(deck: &QuizDeck, answered: usize, stopped_early: bool) -> Self {
        Self {
            score: deck.final_score(),
            answered,
            total: deck.len(),
            stopped_early,
        }
    }
}

#[derive(Debug, Clone)]
pub enum SessionState {
    NotStarted,
    AwaitingChoice(Round),
    Answered(Round, Verdict),
    Finished(Summary),
    Exited,
}

impl SessionState {
    pub fn name(&self) -> &'static str {
        match self {
            SessionState::NotStarted => "not started",
            SessionState::AwaitingChoice(_) => "awaiting a choice",
            SessionState::Answered(..) => "showing the answer",
            SessionState::Finished(_) => "finished",
            SessionState::Exited => "exited",
        }
    }
}

/// Drives one player through decks of `items`, one game at a time.
pub struct Session<R> {
    items: Vec<QuizItem>,
    rng: R,
    state: SessionState,
}

impl<R: Rng> Session<R> {
    /// Checks `items` up front so that starting or restarting a game cannot fail later.
    pub fn new(items: Vec<QuizItem>, mut rng: R) -> Result<Self, QuizError> {
        QuizDeck::create(items.clone(), &mut rng)?;
        Ok(Self {
            items,
            rng,
            state: SessionState::NotStarted,
        })
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Applies one input. Inputs that make no sense in the current state are rejected and
    /// leave the state as it was.
    pub fn handle(&mut self, event: Event) -> Result<&SessionState, QuizError> {
        debug!("[Session] {} while {}", event.name(), self.state.name());
        let current = mem::replace(&mut self.state, SessionState::NotStarted);
        self.state = match (current, event) {
            (_, Event::Exit) => {
                info!("[Session] Exiting");
                SessionState::Exited
            }
            (previous @ SessionState::NotStarted, Event::Start)
            | (previous @ SessionState::Finished(_), Event::Restart) => match self.new_game() {
                Ok(state) => state,
                Err(err) => {
                    self.state = previous;
                    return Err(err);
                }
            },
            (SessionState::AwaitingChoice(round), Event::Select(label))
                if !round.options.contains(&label) =>
            {
                self.state = SessionState::AwaitingChoice(round);
                return Err(QuizError::UnknownOption { option: label });
            }
            (SessionState::AwaitingChoice(mut round), Event::Select(label)) => {
                let correct = round.options.is_correct(&label);
                round.deck.record_answer(correct);
                let verdict = Verdict {
                    selected: label,
                    correct,
                    correct_label: round.item.label.clone(),
                };
                SessionState::Answered(round, verdict)
            }
            (SessionState::Answered(round, verdict), Event::Advance) => {
                let mut deck = round.deck.clone();
                deck.advance();
                if deck.is_exhausted() {
                    let answered = deck.position();
                    self.finish(Summary::new(&deck, answered, false))
                } else {
                    match self.deal(deck) {
                        Ok(state) => state,
                        Err(err) => {
                            self.state = SessionState::Answered(round, verdict);
                            return Err(err);
                        }
                    }
                }
            }
            (SessionState::AwaitingChoice(round), Event::StopEarly) => {
                let answered = round.deck.position();
                self.finish(Summary::new(&round.deck, answered, true))
            }
            (SessionState::Answered(round, _), Event::StopEarly) => {
                let answered = round.deck.position() + 1;
                self.finish(Summary::new(&round.deck, answered, true))
            }
            (state, event) => {
                warn!("[Session] Ignoring {} while {}", event.name(), state.name());
                let error = QuizError::UnexpectedEvent {
                    state: state.name(),
                    event: event.name(),
                };
                self.state = state;
                return Err(error);
            }
        };
        Ok(&self.state)
    }

    fn new_game(&mut self) -> Result<SessionState, QuizError> {
        let deck = QuizDeck::create(self.items.clone(), &mut self.rng)?;
        info!("[Session] New game with {} items", deck.len());
        self.deal(deck)
    }

    fn deal(&mut self, deck: QuizDeck) -> Result<SessionState, QuizError> {
        let item = deck.current_item()?.clone();
        let options = options::generate(&item.label, deck.labels(), &mut self.rng)?;
        debug!(
            "[Session] Round {}/{}: {:?}",
            deck.position() + 1,
            deck.len(),
            item.reference
        );
        Ok(SessionState::AwaitingChoice(Round {
            deck,
            item,
            options,
        }))
    }

    fn finish(&self, summary: Summary) -> SessionState {
        info!(
            "[Session] Finished with {}/{} ({} answered)",
            summary.score, summary.total, summary.answered
        );
        SessionState::Finished(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn landmarks() -> Vec<QuizItem> {
        vec![
            QuizItem::new("A", "Eiffel Tower"),
            QuizItem::new("B", "Great Wall"),
            QuizItem::new("C", "Pyramids"),
            QuizItem::new("D", "Statue of Liberty"),
            QuizItem::new("E", "Taj Mahal"),
        ]
    }

    fn new_session(seed: u64) -> Session<StdRng> {
        Session::new(landmarks(), StdRng::seed_from_u64(seed)).unwrap()
    }

    fn current_round(session: &Session<StdRng>) -> &Round {
        match session.state() {
            SessionState::AwaitingChoice(round) => round,
            other => panic!("expected a round, got {}", other.name()),
        }
    }

    fn wrong_label(round: &Round) -> String {
        round
            .options()
            .labels()
            .iter()
            .find(|label| !round.options().is_correct(label))
            .cloned()
            .unwrap()
    }

    #[test]
    fn start_deals_first_round() {
        let mut session = new_session(1);
        session.handle(Event::Start).unwrap();

        let round = current_round(&session);
        assert_eq!(round.number(), 1);
        assert_eq!(round.total(), 5);
        assert_eq!(round.score(), 0);
        assert_eq!(round.options().correct_label(), round.item().label);
    }

    #[test]
    fn playing_every_round_correctly_scores_full_marks() {
        let mut session = new_session(2);
        session.handle(Event::Start).unwrap();

        let mut seen = Vec::new();
        for _ in 0..5 {
            let round = current_round(&session);
            seen.push(round.item().label.clone());
            let answer = round.item().label.clone();

            match session.handle(Event::Select(answer)).unwrap() {
                SessionState::Answered(_, verdict) => assert!(verdict.correct),
                other => panic!("expected an answer, got {}", other.name()),
            }
            session.handle(Event::Advance).unwrap();
        }

        seen.sort();
        let mut expected: Vec<String> = landmarks().into_iter().map(|item| item.label).collect();
        expected.sort();
        assert_eq!(seen, expected);

        match session.state() {
            SessionState::Finished(summary) => {
                assert_eq!(summary.score, 5);
                assert_eq!(summary.answered, 5);
                assert!(!summary.stopped_early);
            }
            other => panic!("expected the end, got {}", other.name()),
        }
    }

    #[test]
    fn wrong_answer_reports_correct_label() {
        let mut session = new_session(3);
        session.handle(Event::Start).unwrap();
        let round = current_round(&session);
        let wrong = wrong_label(round);
        let correct = round.item().label.clone();

        match session.handle(Event::Select(wrong.clone())).unwrap() {
            SessionState::Answered(round, verdict) => {
                assert!(!verdict.correct);
                assert_eq!(verdict.selected, wrong);
                assert_eq!(verdict.correct_label, correct);
                assert_eq!(round.score(), 0);
            }
            other => panic!("expected an answer, got {}", other.name()),
        }
    }

    #[test]
    fn answered_round_rejects_another_choice() {
        let mut session = new_session(4);
        session.handle(Event::Start).unwrap();
        let answer = current_round(&session).item().label.clone();
        session.handle(Event::Select(answer.clone())).unwrap();

        let error = session
            .handle(Event::Select(answer))
            .expect_err("second choice for one round");
        assert!(matches!(
            error,
            QuizError::UnexpectedEvent {
                event: "select",
                ..
            }
        ));
        match session.state() {
            SessionState::Answered(round, _) => assert_eq!(round.score(), 1),
            other => panic!("state changed to {}", other.name()),
        }
    }

    #[test]
    fn unknown_option_keeps_round() {
        let mut session = new_session(5);
        session.handle(Event::Start).unwrap();

        let error = session
            .handle(Event::Select("Big Ben".to_string()))
            .expect_err("not an option");
        assert!(matches!(error, QuizError::UnknownOption { .. }));
        assert_eq!(current_round(&session).number(), 1);
    }

    #[test]
    fn advance_needs_an_answer_first() {
        let mut session = new_session(6);
        session.handle(Event::Start).unwrap();
        assert!(session.handle(Event::Advance).is_err());
        assert_eq!(current_round(&session).number(), 1);
    }

    #[test]
    fn stop_early_keeps_score_so_far() {
        let mut session = new_session(7);
        session.handle(Event::Start).unwrap();
        for _ in 0..2 {
            let round = current_round(&session);
            let answer = round.item().label.clone();
            session.handle(Event::Select(answer)).unwrap();
            session.handle(Event::Advance).unwrap();
        }
        let wrong = wrong_label(current_round(&session));
        session.handle(Event::Select(wrong)).unwrap();

        match session.handle(Event::StopEarly).unwrap() {
            SessionState::Finished(summary) => {
                assert_eq!(summary.score, 2);
                assert_eq!(summary.answered, 3);
                assert!(summary.score <= summary.answered);
                assert!(summary.stopped_early);
            }
            other => panic!("expected the end, got {}", other.name()),
        }
    }

    #[test]
    fn stop_before_answering_counts_nothing_extra() {
        let mut session = new_session(8);
        session.handle(Event::Start).unwrap();

        match session.handle(Event::StopEarly).unwrap() {
            SessionState::Finished(summary) => {
                assert_eq!(summary.score, 0);
                assert_eq!(summary.answered, 0);
            }
            other => panic!("expected the end, got {}", other.name()),
        }
    }

    #[test]
    fn restart_begins_a_fresh_game() {
        let mut session = new_session(9);
        session.handle(Event::Start).unwrap();
        let answer = current_round(&session).item().label.clone();
        session.handle(Event::Select(answer)).unwrap();
        session.handle(Event::StopEarly).unwrap();

        assert!(session.handle(Event::Start).is_err());
        session.handle(Event::Restart).unwrap();
        let round = current_round(&session);
        assert_eq!(round.number(), 1);
        assert_eq!(round.score(), 0);
    }

    #[test]
    fn restart_only_from_the_end() {
        let mut session = new_session(10);
        assert!(matches!(
            session.handle(Event::Restart),
            Err(QuizError::UnexpectedEvent {
                state: "not started",
                event: "restart"
            })
        ));
        assert!(matches!(session.state(), SessionState::NotStarted));
    }

    #[test]
    fn exit_from_anywhere() {
        let mut session = new_session(11);
        assert!(matches!(
            session.handle(Event::Exit).unwrap(),
            SessionState::Exited
        ));
        assert!(session.handle(Event::Start).is_err());

        let mut session = new_session(12);
        session.handle(Event::Start).unwrap();
        assert!(matches!(
            session.handle(Event::Exit).unwrap(),
            SessionState::Exited
        ));
    }

    #[test]
    fn new_rejects_small_item_sets() {
        let items = landmarks()[..3].to_vec();
        assert!(matches!(
            Session::new(items, StdRng::seed_from_u64(0)),
            Err(QuizError::InvalidDeck(_))
        ));
    }

    fn unchecked_session(items: Vec<QuizItem>, state: SessionState) -> Session<StdRng> {
        Session {
            items,
            rng: StdRng::seed_from_u64(13),
            state,
        }
    }

    #[test]
    fn failed_start_stays_not_started() {
        let mut session = unchecked_session(landmarks()[..3].to_vec(), SessionState::NotStarted);

        assert!(matches!(
            session.handle(Event::Start),
            Err(QuizError::InvalidDeck(_))
        ));
        assert!(matches!(session.state(), SessionState::NotStarted));
    }

    #[test]
    fn failed_restart_keeps_the_summary() {
        let summary = Summary {
            score: 2,
            answered: 3,
            total: 5,
            stopped_early: true,
        };
        let mut session =
            unchecked_session(landmarks()[..3].to_vec(), SessionState::Finished(summary));

        assert!(session.handle(Event::Restart).is_err());
        match session.state() {
            SessionState::Finished(kept) => assert_eq!(*kept, summary),
            other => panic!("summary lost, now {}", other.name()),
        }
    }

    #[test]
    fn failed_deal_keeps_the_answered_round() {
        let small = landmarks()[..3].to_vec();
        let deck = QuizDeck::in_order(small.clone()).unwrap();
        let item = small[0].clone();
        let options = options::generate(
            &item.label,
            ["Eiffel Tower", "Great Wall", "Pyramids", "Big Ben"],
            &mut StdRng::seed_from_u64(0),
        )
        .unwrap();
        let verdict = Verdict {
            selected: item.label.clone(),
            correct: true,
            correct_label: item.label.clone(),
        };
        let round = Round {
            deck,
            item,
            options,
        };
        let mut session = unchecked_session(small, SessionState::Answered(round, verdict));

        assert!(matches!(
            session.handle(Event::Advance),
            Err(QuizError::InsufficientDistractors { .. })
        ));
        match session.state() {
            SessionState::Answered(round, verdict) => {
                assert_eq!(round.number(), 1);
                assert!(verdict.correct);
            }
            other => panic!("round lost, now {}", other.name()),
        }
    }
}
