/*
player_input.rs

Copyright 2025 Hervé Quatremain

This file is part of Turtle Tail.

Turtle Tail is free software: you can redistribute it and/or modify it under the
terms of the GNU General Public License as published by the Free Software
Foundation, either version 3 of the License, or (at your option) any later
version.

Turtle Tail is distributed in the hope that it will be useful, but WITHOUT ANY
WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR
A PARTICULAR PURPOSE. See the GNU General Public License for more details.

You should have received a copy of the GNU General Public License along with
Turtle Tail. If not, see <https://www.gnu.org/licenses/>.

SPDX-License-Identifier: GPL-3.0-or-later
*/

//! Manage the player's planned moves.
//!
//! The player drags direction arrows into a row of slots. The module keeps the content of the
//! slots, as well as the undo and redo lists.
//! Arrows carry a text label. Labels that do not name a direction are rejected.

use log::warn;

use crate::grid::{Direction, DirectionError};

/// Slot parameters for an undo and redo operation.
#[derive(Debug, Clone, Copy)]
struct DoOperation {
    /// Slot position.
    slot: usize,

    /// Slot content before the operation.
    before: Option<Direction>,

    /// Slot content after the operation.
    after: Option<Direction>,
}

/// Error returned when an arrow cannot be dropped.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error(transparent)]
    Direction(#[from] DirectionError),

    #[error("slot {slot} does not exist ({len} slots)")]
    NoSuchSlot { slot: usize, len: usize },
}

/// Manage the slots that the player fills.
#[derive(Debug, Clone)]
pub struct PlayerInput {
    /// Content of the slots.
    slots: Vec<Option<Direction>>,

    /// List of undo operations.
    undo_op: Vec<DoOperation>,

    /// List of redo operations.
    redo_op: Vec<DoOperation>,
}

impl PlayerInput {
    /// Create a [`PlayerInput`] object with the given number of empty slots.
    pub fn new(len: usize) -> Self {
        Self {
            slots: vec![None; len],
            undo_op: Vec::new(),
            redo_op: Vec::new(),
        }
    }

    /// Empty the slots and the undo and redo lists. The number of slots can change.
    pub fn reset(&mut self, len: usize) {
        self.slots = vec![None; len];
        self.undo_op.clear();
        self.redo_op.clear();
    }

    /// Return the content of the slots.
    pub fn slots(&self) -> &[Option<Direction>] {
        &self.slots
    }

    /// Number of slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether there is no slot at all.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Whether all the slots hold an arrow.
    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    /// Return the planned moves: the arrows in slot order, skipping the empty slots.
    pub fn sequence(&self) -> Vec<Direction> {
        self.slots.iter().flatten().copied().collect()
    }

    /// Drop the arrow with the given label in a slot.
    ///
    /// # Errors
    ///
    /// The method returns an error when the label is not a direction, or when the slot does not
    /// exist. The slots are not changed in that case.
    pub fn drop_label(&mut self, slot: usize, label: &str) -> Result<(), InputError> {
        let direction: Direction = match label.parse() {
            Ok(d) => d,
            Err(e) => {
                warn!("Rejecting dropped arrow {label:?}");
                return Err(InputError::Direction(e));
            }
        };
        self.set(slot, direction)
    }

    /// Put an arrow in a slot, replacing the previous one.
    pub fn set(&mut self, slot: usize, direction: Direction) -> Result<(), InputError> {
        let before: Option<Direction> = self.get_slot(slot)?;
        self.slots[slot] = Some(direction);
        self.push_undo(slot, before, Some(direction));
        Ok(())
    }

    /// Remove the arrow from a slot.
    pub fn remove(&mut self, slot: usize) -> Result<(), InputError> {
        let before: Option<Direction> = self.get_slot(slot)?;
        if before.is_some() {
            self.slots[slot] = None;
            self.push_undo(slot, before, None);
        }
        Ok(())
    }

    /// Fill the slots from the start with the given moves. Extra moves are ignored.
    pub fn fill(&mut self, directions: &[Direction]) {
        self.reset(self.slots.len());
        for (slot, d) in directions.iter().take(self.slots.len()).enumerate() {
            self.slots[slot] = Some(*d);
        }
    }

    /// Undo the last operation.
    pub fn undo(&mut self) {
        if let Some(op) = self.undo_op.pop() {
            self.slots[op.slot] = op.before;
            self.redo_op.push(op);
        }
    }

    /// Redo the last undo operation.
    pub fn redo(&mut self) {
        if let Some(op) = self.redo_op.pop() {
            self.slots[op.slot] = op.after;
            self.undo_op.push(op);
        }
    }

    /// Return the length of the undo list.
    pub fn undo_len(&self) -> usize {
        self.undo_op.len()
    }

    /// Return the length of the redo list.
    pub fn redo_len(&self) -> usize {
        self.redo_op.len()
    }

    fn get_slot(&self, slot: usize) -> Result<Option<Direction>, InputError> {
        self.slots
            .get(slot)
            .copied()
            .ok_or(InputError::NoSuchSlot {
                slot,
                len: self.slots.len(),
            })
    }

    fn push_undo(&mut self, slot: usize, before: Option<Direction>, after: Option<Direction>) {
        self.undo_op.push(DoOperation {
            slot,
            before,
            after,
        });
        self.redo_op.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Direction::*;

    #[test]
    fn test_drop_labels() {
        let mut input: PlayerInput = PlayerInput::new(3);
        input.drop_label(0, "right").unwrap();
        input.drop_label(2, "Right").unwrap();
        assert!(!input.is_complete());
        assert_eq!(input.sequence(), vec![Right, Right]);

        input.drop_label(1, "up").unwrap();
        assert!(input.is_complete());
        assert_eq!(input.sequence(), vec![Right, Up, Right]);
    }

    #[test]
    fn test_unknown_label_does_not_default() {
        let mut input: PlayerInput = PlayerInput::new(2);
        assert_eq!(
            input.drop_label(0, "jump"),
            Err(InputError::Direction(DirectionError::UnknownLabel(
                "jump".to_string()
            )))
        );
        assert_eq!(input.slots(), &[None, None]);
        assert_eq!(input.undo_len(), 0);

        assert_eq!(
            input.drop_label(5, "up"),
            Err(InputError::NoSuchSlot { slot: 5, len: 2 })
        );
    }

    #[test]
    fn test_undo_redo() {
        let mut input: PlayerInput = PlayerInput::new(2);
        input.set(0, Left).unwrap();
        input.set(0, Down).unwrap();
        input.remove(0).unwrap();
        assert_eq!(input.undo_len(), 3);
        assert_eq!(input.slots(), &[None, None]);

        input.undo();
        assert_eq!(input.slots(), &[Some(Down), None]);
        input.undo();
        assert_eq!(input.slots(), &[Some(Left), None]);
        assert_eq!(input.redo_len(), 2);

        input.redo();
        assert_eq!(input.slots(), &[Some(Down), None]);

        // A new operation clears the redo list
        input.set(1, Up).unwrap();
        assert_eq!(input.redo_len(), 0);
        assert_eq!(input.sequence(), vec![Down, Up]);
    }

    #[test]
    fn test_fill_and_reset() {
        let mut input: PlayerInput = PlayerInput::new(2);
        input.fill(&[Up, Down, Left]);
        assert_eq!(input.sequence(), vec![Up, Down]);
        input.reset(4);
        assert_eq!(input.len(), 4);
        assert!(input.sequence().is_empty());
    }
}
