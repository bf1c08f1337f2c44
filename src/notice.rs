//! In-page notices and confirmations.
//!
//! Stand-ins for `alert`/`confirm`/`prompt`: notices stack in a corner and expire on
//! their own, confirmations are a modal with explicit accept/decline buttons.

use std::rc::Rc;
use yew::Reducible;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Success,
    Error,
}

impl NoticeKind {
    pub fn class(self) -> &'static str {
        match self {
            NoticeKind::Info => "notice-info",
            NoticeKind::Success => "notice-success",
            NoticeKind::Error => "notice-error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub id: u64,
    pub kind: NoticeKind,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NoticeAction {
    Push(NoticeKind, String),
    Dismiss(u64),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NoticeBoard {
    next_id: u64,
    notices: Vec<Notice>,
}

impl NoticeBoard {
    pub fn push(&mut self, kind: NoticeKind, text: impl Into<String>) -> u64 {
        self.next_id += 1;
        let id = self.next_id;
        self.notices.push(Notice {
            id,
            kind,
            text: text.into(),
        });
        id
    }

    pub fn dismiss(&mut self, id: u64) -> bool {
        let before = self.notices.len();
        self.notices.retain(|n| n.id != id);
        self.notices.len() != before
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }
}

impl Reducible for NoticeBoard {
    type Action = NoticeAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut next = (*self).clone();
        match action {
            NoticeAction::Push(kind, text) => {
                next.push(kind, text);
            }
            NoticeAction::Dismiss(id) => {
                if !next.dismiss(id) {
                    return self;
                }
            }
        }
        Rc::new(next)
    }
}

/// What happens when a confirmation is accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmAction {
    RegisterEvent { name: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation {
    pub question: String,
    pub action: ConfirmAction,
}

impl Confirmation {
    pub fn register_event(name: &str) -> Self {
        Self {
            question: format!("¿Deseas registrarte para el evento \"{}\"?", name),
            action: ConfirmAction::RegisterEvent {
                name: name.to_string(),
            },
        }
    }

    /// Notice shown once the user accepts.
    pub fn accepted_notice(&self) -> String {
        match &self.action {
            ConfirmAction::RegisterEvent { name } => format!(
                "¡Te has registrado exitosamente para \"{}\"! Recibirás más información por correo.",
                name
            ),
        }
    }
}

/// Notice for a search term; blank terms produce nothing.
pub fn search_notice(term: &str) -> Option<String> {
    let term = term.trim();
    if term.is_empty() {
        return None;
    }
    Some(format!(
        "Buscando: \"{}\". Esta funcionalidad se integrará con el sistema de búsqueda.",
        term
    ))
}

/// Notice for the "Más información" action of a product card.
pub fn product_redirect_notice(title: &str) -> String {
    format!("Redirigiendo a más información sobre {}...", title)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn ids_are_unique_and_dismiss_is_targeted() {
        let mut board = NoticeBoard::default();
        let a = board.push(NoticeKind::Info, "uno");
        let b = board.push(NoticeKind::Success, "dos");
        assert_ne!(a, b);
        assert!(board.dismiss(a));
        assert!(!board.dismiss(a));
        assert_eq!(board.notices().len(), 1);
        assert_eq!(board.notices()[0].text, "dos");
    }

    #[test]
    fn dismissing_unknown_notice_keeps_state() {
        let board = Rc::new(NoticeBoard::default());
        let same = board.clone().reduce(NoticeAction::Dismiss(42));
        assert!(Rc::ptr_eq(&board, &same));
    }

    #[test]
    fn event_registration_copy() {
        let confirmation = Confirmation::register_event("Festival de Navidad");
        assert_eq!(
            confirmation.question,
            "¿Deseas registrarte para el evento \"Festival de Navidad\"?"
        );
        assert_eq!(
            confirmation.accepted_notice(),
            "¡Te has registrado exitosamente para \"Festival de Navidad\"! Recibirás más información por correo."
        );
    }

    #[test]
    fn blank_search_is_ignored() {
        assert_eq!(search_notice("   "), None);
        assert_eq!(
            search_notice(" CDAT ").as_deref(),
            Some("Buscando: \"CDAT\". Esta funcionalidad se integrará con el sistema de búsqueda.")
        );
    }
}
