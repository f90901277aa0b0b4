//! Blackjack: one shared shoe, one seated player against the dealer.
//!
//! ```text
//! Betting ──Deal──▶ Playing ──Stand──▶ Dealer ──▶ Finished ──NewHand──▶ Betting
//!    │                 │                             ▲
//!    │                 └──Hit (bust or 21)───────────┤
//!    └──Deal (natural 21)────────────────────────────┘
//! ```
//!
//! Every action is an authoritative mutation of the room's document, so all
//! participants watch the same hand. Only the seated player may act; the
//! seat moves to the next player in turn order on `NewHand`.

use std::fmt;

use parlor_protocol::PlayerId;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::engine::{remove_from_turn_order, seat_of};
use crate::{GameEngine, GameError};

/// The dealer draws while below this total.
pub const DEALER_STANDS_AT: u32 = 17;

const BLACKJACK: u32 = 21;

// ---------------------------------------------------------------------------
// Cards
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Suit {
    Hearts,
    Diamonds,
    Clubs,
    Spades,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Self::Hearts, Self::Diamonds, Self::Clubs, Self::Spades];

    fn symbol(self) -> char {
        match self {
            Self::Hearts => '♥',
            Self::Diamonds => '♦',
            Self::Clubs => '♣',
            Self::Spades => '♠',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rank {
    Ace,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
}

impl Rank {
    pub const ALL: [Rank; 13] = [
        Self::Ace,
        Self::Two,
        Self::Three,
        Self::Four,
        Self::Five,
        Self::Six,
        Self::Seven,
        Self::Eight,
        Self::Nine,
        Self::Ten,
        Self::Jack,
        Self::Queen,
        Self::King,
    ];

    /// The card's value before any soft-ace adjustment. Aces count 11.
    pub fn value(self) -> u32 {
        match self {
            Self::Ace => 11,
            Self::Two => 2,
            Self::Three => 3,
            Self::Four => 4,
            Self::Five => 5,
            Self::Six => 6,
            Self::Seven => 7,
            Self::Eight => 8,
            Self::Nine => 9,
            Self::Ten | Self::Jack | Self::Queen | Self::King => 10,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Ace => "A",
            Self::Two => "2",
            Self::Three => "3",
            Self::Four => "4",
            Self::Five => "5",
            Self::Six => "6",
            Self::Seven => "7",
            Self::Eight => "8",
            Self::Nine => "9",
            Self::Ten => "10",
            Self::Jack => "J",
            Self::Queen => "Q",
            Self::King => "K",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub suit: Suit,
    pub rank: Rank,
}

impl Card {
    pub fn new(rank: Rank, suit: Suit) -> Self {
        Self { suit, rank }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank.label(), self.suit.symbol())
    }
}

/// The best total for a hand.
///
/// Aces start at 11; while the total is over 21 and an ace still counts 11,
/// one ace drops to 1. Which ace is demoted does not affect the sum.
pub fn hand_value(cards: &[Card]) -> u32 {
    let mut total: u32 = cards.iter().map(|c| c.rank.value()).sum();
    let mut soft_aces = cards.iter().filter(|c| c.rank == Rank::Ace).count();
    while total > BLACKJACK && soft_aces > 0 {
        total -= 10;
        soft_aces -= 1;
    }
    total
}

// ---------------------------------------------------------------------------
// Shoe
// ---------------------------------------------------------------------------

/// The undealt cards. Cards are drawn from the back of the vector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Shoe {
    cards: Vec<Card>,
}

impl Shoe {
    /// A full 52-card deck in a uniformly random order.
    pub fn shuffled<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut cards: Vec<Card> = Suit::ALL
            .into_iter()
            .flat_map(|suit| Rank::ALL.into_iter().map(move |rank| Card::new(rank, suit)))
            .collect();
        cards.shuffle(rng);
        Self { cards }
    }

    /// A shoe whose cards come out in exactly the given order.
    pub fn stacked(draw_order: impl IntoIterator<Item = Card>) -> Self {
        let mut cards: Vec<Card> = draw_order.into_iter().collect();
        cards.reverse();
        Self { cards }
    }

    pub fn draw(&mut self) -> Result<Card, GameError> {
        self.cards.pop().ok_or(GameError::ShoeEmpty)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlackjackPhase {
    #[default]
    Betting,
    Playing,
    Dealer,
    Finished,
}

impl BlackjackPhase {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Betting => "betting",
            Self::Playing => "playing",
            Self::Dealer => "dealer",
            Self::Finished => "finished",
        }
    }
}

/// How a finished hand ended, from the player's side of the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    PlayerBust,
    DealerBust,
    PlayerWins,
    DealerWins,
    Push,
}

impl Outcome {
    /// Settles a hand. Checked in order: player bust, dealer bust, higher
    /// total, tie.
    pub fn settle(player_total: u32, dealer_total: u32) -> Self {
        if player_total > BLACKJACK {
            Self::PlayerBust
        } else if dealer_total > BLACKJACK {
            Self::DealerBust
        } else if player_total > dealer_total {
            Self::PlayerWins
        } else if dealer_total > player_total {
            Self::DealerWins
        } else {
            Self::Push
        }
    }

    pub fn player_won(self) -> bool {
        matches!(self, Self::DealerBust | Self::PlayerWins)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlackjackState {
    pub phase: BlackjackPhase,
    pub shoe: Shoe,
    pub player_hand: Vec<Card>,
    pub dealer_hand: Vec<Card>,
    pub outcome: Option<Outcome>,
    /// Players in join order. `turn_order[seat]` plays the current hand.
    pub turn_order: Vec<PlayerId>,
    pub seat: usize,
}

impl BlackjackState {
    /// A table in `Betting` with the given shoe and the first player seated.
    pub fn new(turn_order: Vec<PlayerId>, shoe: Shoe) -> Self {
        Self {
            phase: BlackjackPhase::Betting,
            shoe,
            player_hand: Vec::new(),
            dealer_hand: Vec::new(),
            outcome: None,
            turn_order,
            seat: 0,
        }
    }

    /// The player whose hand is on the table, if anyone is seated.
    pub fn seated_player(&self) -> Option<PlayerId> {
        self.turn_order.get(self.seat).copied()
    }

    pub fn player_total(&self) -> u32 {
        hand_value(&self.player_hand)
    }

    pub fn dealer_total(&self) -> u32 {
        hand_value(&self.dealer_hand)
    }

    fn deal(&mut self) -> Result<(), GameError> {
        for _ in 0..2 {
            let card = self.shoe.draw()?;
            self.player_hand.push(card);
        }
        for _ in 0..2 {
            let card = self.shoe.draw()?;
            self.dealer_hand.push(card);
        }
        if self.player_total() == BLACKJACK {
            // A natural settles immediately; the dealer does not draw.
            self.finish();
        } else {
            self.phase = BlackjackPhase::Playing;
        }
        Ok(())
    }

    fn hit(&mut self) -> Result<(), GameError> {
        let card = self.shoe.draw()?;
        self.player_hand.push(card);
        match self.player_total() {
            t if t > BLACKJACK => {
                self.finish();
                Ok(())
            }
            BLACKJACK => self.stand(),
            _ => Ok(()),
        }
    }

    fn stand(&mut self) -> Result<(), GameError> {
        self.phase = BlackjackPhase::Dealer;
        while self.dealer_total() < DEALER_STANDS_AT {
            let card = self.shoe.draw()?;
            self.dealer_hand.push(card);
        }
        self.finish();
        Ok(())
    }

    fn finish(&mut self) {
        self.outcome = Some(Outcome::settle(self.player_total(), self.dealer_total()));
        self.phase = BlackjackPhase::Finished;
    }

    /// Clears the table back to `Betting` without touching the seat.
    fn clear_table(&mut self) {
        self.phase = BlackjackPhase::Betting;
        self.player_hand.clear();
        self.dealer_hand.clear();
        self.outcome = None;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlackjackAction {
    Deal,
    Hit,
    Stand,
    /// Clears a finished hand, passes the seat on, and brings a fresh shoe.
    NewHand,
}

impl BlackjackAction {
    fn name(self) -> &'static str {
        match self {
            Self::Deal => "deal",
            Self::Hit => "hit",
            Self::Stand => "stand",
            Self::NewHand => "new hand",
        }
    }

    fn allowed_in(self) -> BlackjackPhase {
        match self {
            Self::Deal => BlackjackPhase::Betting,
            Self::Hit | Self::Stand => BlackjackPhase::Playing,
            Self::NewHand => BlackjackPhase::Finished,
        }
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

pub struct Blackjack;

impl GameEngine for Blackjack {
    type Document = BlackjackState;
    type Action = BlackjackAction;

    fn init<R: Rng + ?Sized>(turn_order: &[PlayerId], rng: &mut R) -> BlackjackState {
        BlackjackState::new(turn_order.to_vec(), Shoe::shuffled(rng))
    }

    fn apply_action<R: Rng + ?Sized>(
        doc: &BlackjackState,
        action: BlackjackAction,
        actor: PlayerId,
        rng: &mut R,
    ) -> Result<BlackjackState, GameError> {
        Self::validate_action(doc, &action, actor)?;
        let mut next = doc.clone();
        match action {
            BlackjackAction::Deal => next.deal()?,
            BlackjackAction::Hit => next.hit()?,
            BlackjackAction::Stand => next.stand()?,
            BlackjackAction::NewHand => {
                next.clear_table();
                next.shoe = Shoe::shuffled(rng);
                if !next.turn_order.is_empty() {
                    next.seat = (next.seat + 1) % next.turn_order.len();
                }
            }
        }
        Ok(next)
    }

    fn is_terminal(doc: &BlackjackState) -> bool {
        doc.phase == BlackjackPhase::Finished
    }

    fn validate_action(
        doc: &BlackjackState,
        action: &BlackjackAction,
        actor: PlayerId,
    ) -> Result<(), GameError> {
        if seat_of(&doc.turn_order, actor)? != doc.seat {
            return Err(GameError::NotYourTurn(actor));
        }
        if doc.phase != action.allowed_in() {
            return Err(GameError::InvalidPhase {
                action: action.name(),
                phase: doc.phase.as_str(),
            });
        }
        Ok(())
    }

    fn on_player_join(doc: &mut BlackjackState, player: PlayerId) {
        if !doc.turn_order.contains(&player) {
            doc.turn_order.push(player);
        }
    }

    fn on_player_leave(doc: &mut BlackjackState, player: PlayerId) {
        let was_seated = remove_from_turn_order(&mut doc.turn_order, &mut doc.seat, player);
        if was_seated && doc.phase != BlackjackPhase::Betting {
            // The hand in play belonged to the departed player.
            doc.clear_table();
        }
    }
}
