//! Forward-reference table for footnotes.
//!
//! markdown-it emits `footnote_ref` tokens inline and collects the
//! definitions in a `footnote_block` at the end of the stream, so a note
//! node exists in the tree long before its body is known. The registry maps
//! each footnote id to the note's payload cell and patches it in place once
//! the definition is built.
//!
//! A definition body may itself reference footnotes, including its own id
//! or one whose body leads back to it. Those references are detached into
//! fresh pending notes before patching, so the tree stays acyclic.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Weak;

use crate::ast::{Node, Note, NoteContent};

/// Non-owning handles to the payload cells of one conversion pass.
#[derive(Debug, Default)]
pub struct FootnoteRegistry {
    notes: HashMap<String, Weak<RefCell<NoteContent>>>,
}

impl FootnoteRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Note handle for a reference to `id`.
    ///
    /// References to an id already in the tree share its cell.
    pub fn register(&mut self, id: &str) -> Note {
        if let Some(cell) = self.notes.get(id).and_then(Weak::upgrade) {
            return Note::from_cell(cell);
        }
        let note = Note::pending(id);
        self.notes.insert(id.to_string(), note.downgrade());
        note
    }

    /// Patch the pending note for `id` with its definition body.
    ///
    /// Returns `false` when no live reference is waiting for this id, which
    /// includes a repeated definition of an id already resolved.
    pub fn resolve(&mut self, id: &str, mut body: Vec<Node>) -> bool {
        let Some(cell) = self.notes.get(id).and_then(Weak::upgrade) else {
            log::debug!("Footnote definition {:?} has no reference, dropping it", id);
            return false;
        };
        let target = Note::from_cell(cell);
        if target.is_resolved() {
            log::debug!("Footnote {:?} is already defined, keeping the first body", id);
            return false;
        }
        let detached = self.detach_cycles(&mut body, &target);
        if detached > 0 {
            log::debug!(
                "Footnote {:?} refers back to itself, leaving {} reference(s) unresolved",
                id,
                detached
            );
        }
        log::debug!("Resolved footnote {:?} ({} blocks)", id, body.len());
        target.set_content(NoteContent::Resolved(body));
        true
    }

    /// Replace every note in `nodes` that is `target` or leads back to it
    /// with a new pending note carrying the same id. Returns the count.
    fn detach_cycles(&self, nodes: &mut [Node], target: &Note) -> usize {
        let mut detached = 0;
        for node in nodes {
            if let Node::Note(note) = node {
                if note.same_note(target) || reaches(note, target, &mut HashSet::new()) {
                    let id = self.id_of(note);
                    *node = Node::Note(Note::pending(id));
                    detached += 1;
                }
                continue;
            }
            for list in node.child_lists_mut() {
                detached += self.detach_cycles(list, target);
            }
        }
        detached
    }

    fn id_of(&self, note: &Note) -> String {
        if let NoteContent::Pending(id) = &*note.content() {
            return id.clone();
        }
        self.notes
            .iter()
            .find(|(_, cell)| cell.as_ptr() == note.as_ptr())
            .map(|(id, _)| id.clone())
            .unwrap_or_default()
    }

    /// Ids referenced in the tree that never received a definition.
    pub fn unresolved(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self
            .notes
            .iter()
            .filter(|(_, cell)| {
                cell.upgrade()
                    .is_some_and(|cell| matches!(*cell.borrow(), NoteContent::Pending(_)))
            })
            .map(|(id, _)| id.as_str())
            .collect();
        ids.sort_unstable();
        ids
    }
}

/// Whether the resolved body of `note` contains `target`, at any depth.
fn reaches(
    note: &Note,
    target: &Note,
    seen: &mut HashSet<*const RefCell<NoteContent>>,
) -> bool {
    if !seen.insert(note.as_ptr()) {
        return false;
    }
    match &*note.content() {
        NoteContent::Pending(_) => false,
        NoteContent::Resolved(body) => body_reaches(body, target, seen),
    }
}

fn body_reaches(
    nodes: &[Node],
    target: &Note,
    seen: &mut HashSet<*const RefCell<NoteContent>>,
) -> bool {
    nodes.iter().any(|node| match node {
        Node::Note(note) => note.same_note(target) || reaches(note, target, seen),
        _ => node
            .child_lists()
            .into_iter()
            .any(|list| body_reaches(list, target, seen)),
    })
}
