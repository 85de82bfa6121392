use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::card::{Card, CardId};

/// Face-down cards of one level. The order is fixed when the stack is
/// built; drawing always takes the top card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardStack {
    cards: VecDeque<Card>,
}

impl CardStack {
    pub fn new(cards: Vec<Card>) -> Self {
        Self {
            cards: cards.into(),
        }
    }

    /// `None` once the stack is exhausted; that is not an error.
    pub fn draw(&mut self) -> Option<Card> {
        self.cards.pop_front()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

/// A level's stack together with its face-up window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardRow {
    stack: CardStack,
    for_sale: Vec<Option<Card>>,
}

impl CardRow {
    /// Fills `window` slots from the top of `stack`. Slots stay empty when
    /// the stack runs out.
    pub fn deal(mut stack: CardStack, window: usize) -> Self {
        let for_sale = (0..window).map(|_| stack.draw()).collect();
        Self { stack, for_sale }
    }

    pub fn stack(&self) -> &CardStack {
        &self.stack
    }

    pub fn slots(&self) -> &[Option<Card>] {
        &self.for_sale
    }

    pub fn cards_for_sale(&self) -> impl Iterator<Item = &Card> {
        self.for_sale.iter().flatten()
    }

    pub fn position(&self, card_id: &CardId) -> Option<usize> {
        self.for_sale
            .iter()
            .position(|slot| slot.as_ref().is_some_and(|card| &card.id == card_id))
    }

    pub fn card(&self, card_id: &CardId) -> Option<&Card> {
        self.cards_for_sale().find(|card| &card.id == card_id)
    }

    /// Removes the card in `slot` and immediately refills the slot from the
    /// stack.
    pub fn take(&mut self, slot: usize) -> Option<Card> {
        let taken = self.for_sale.get_mut(slot)?.take()?;
        self.for_sale[slot] = self.stack.draw();
        Some(taken)
    }

    pub fn draw_blind(&mut self) -> Option<Card> {
        self.stack.draw()
    }

    /// Cards still on the table for this level, face-up or face-down.
    pub fn card_count(&self) -> usize {
        self.stack.len() + self.cards_for_sale().count()
    }
}
