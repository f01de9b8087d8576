//! Menu cursor and screen state machine

use heapless::Vec;

use super::results::ScanResults;
use super::tree::{ActionId, ItemKind, MenuNode, MenuTree, NodeId};
use crate::input::EncoderEvent;
use crate::time::{reached, Millis};
use crate::traits::radio::ScanEntry;

/// Most rows a view can carry
pub const MAX_VIEW_ITEMS: usize = 8;

const SCANNING_ITEMS: &[&str] = &["Scanning..."];
const FLOODING_ITEMS: &[&str] = &["Advertising", "Press to stop"];

/// Transient message screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Notice {
    pub title: &'static str,
    pub message: &'static str,
}

impl Notice {
    pub const fn new(title: &'static str, message: &'static str) -> Self {
        Self { title, message }
    }
}

/// Screen being shown
///
/// Every screen other than `Menu` remembers the submenu it was opened
/// from (`owner`) and the index of the leaf that opened it (`origin`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Screen {
    Menu(NodeId),
    /// Blocking scan in progress
    Scanning { owner: NodeId, origin: usize },
    ScanResults { owner: NodeId, origin: usize },
    /// Flood task running
    Flooding { owner: NodeId, origin: usize },
    Notice {
        owner: NodeId,
        origin: usize,
        notice: Notice,
        /// Armed on the first expiry check after the notice is shown
        expires_at: Option<Millis>,
    },
}

impl Screen {
    /// Submenu and leaf index this screen returns to
    pub fn anchor(&self) -> Option<(NodeId, usize)> {
        match *self {
            Screen::Menu(_) => None,
            Screen::Scanning { owner, origin }
            | Screen::ScanResults { owner, origin }
            | Screen::Flooding { owner, origin }
            | Screen::Notice { owner, origin, .. } => Some((owner, origin)),
        }
    }

    pub fn is_menu(&self) -> bool {
        matches!(self, Screen::Menu(_))
    }
}

/// Result of a click
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClickOutcome {
    /// Nothing to do on this screen
    Ignored,
    /// Screen or cursor changed
    Moved,
    /// The selected leaf names an action for the caller to run
    Dispatch(ActionId),
}

/// Menu cursor, current screen, and scan results
#[derive(Debug, Clone)]
pub struct MenuModel {
    tree: &'static MenuTree,
    screen: Screen,
    selected: usize,
    results: ScanResults,
}

impl MenuModel {
    /// Start at the root, first item
    pub fn new(tree: &'static MenuTree) -> Self {
        Self {
            tree,
            screen: Screen::Menu(tree.root),
            selected: 0,
            results: ScanResults::new(),
        }
    }

    pub fn tree(&self) -> &'static MenuTree {
        self.tree
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    /// Raw cursor index
    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn results(&self) -> &ScanResults {
        &self.results
    }

    /// Node shown when the screen is a menu
    pub fn current_node(&self) -> Option<&'static MenuNode> {
        match self.screen {
            Screen::Menu(id) => self.tree.node(id),
            _ => None,
        }
    }

    /// Number of selectable rows on the current screen
    pub fn item_count(&self) -> usize {
        match self.screen {
            Screen::Menu(id) => self.tree.node(id).map_or(0, |node| node.items.len()),
            Screen::ScanResults { .. } => self.results.len(),
            _ => 0,
        }
    }

    /// Selected row, if the screen has a cursor and rows to put it on
    pub fn cursor(&self) -> Option<usize> {
        if self.item_count() > 0 {
            Some(self.selected)
        } else {
            None
        }
    }

    pub fn is_home(&self) -> bool {
        self.screen == Screen::Menu(self.tree.root)
    }

    /// Move the cursor one step, wrapping at both ends
    ///
    /// Returns whether the cursor moved.
    pub fn on_encoder(&mut self, event: EncoderEvent) -> bool {
        let count = self.item_count();
        if count == 0 {
            return false;
        }
        let before = self.selected;
        self.selected = match event {
            EncoderEvent::Right => (self.selected + 1) % count,
            EncoderEvent::Left => (self.selected + count - 1) % count,
        };
        self.selected != before
    }

    /// Select the highlighted item
    pub fn on_click(&mut self) -> ClickOutcome {
        match self.screen {
            Screen::Menu(id) => {
                let Some(node) = self.tree.node(id) else {
                    return ClickOutcome::Ignored;
                };
                let Some(item) = node.items.get(self.selected) else {
                    return ClickOutcome::Ignored;
                };
                match item.kind {
                    ItemKind::Submenu(child) => {
                        self.enter(child);
                        ClickOutcome::Moved
                    }
                    ItemKind::Back => {
                        self.enter(node.parent.unwrap_or(self.tree.root));
                        ClickOutcome::Moved
                    }
                    ItemKind::Action(action) => ClickOutcome::Dispatch(action),
                }
            }
            Screen::ScanResults { .. } | Screen::Notice { .. } => {
                self.return_to_owner();
                ClickOutcome::Moved
            }
            Screen::Scanning { .. } | Screen::Flooding { .. } => ClickOutcome::Ignored,
        }
    }

    /// Escape to the root menu from anywhere else
    ///
    /// Returns whether the screen changed.
    pub fn on_long_press(&mut self) -> bool {
        if self.is_home() {
            return false;
        }
        self.results.clear();
        self.enter(self.tree.root);
        true
    }

    /// Show the in-progress screen for the highlighted scan leaf
    pub fn show_scanning(&mut self) {
        let (owner, origin) = self.anchor();
        self.screen = Screen::Scanning { owner, origin };
    }

    /// Show scan results with the cursor on the first entry
    pub fn show_scan_results(&mut self, entries: &[ScanEntry]) {
        let (owner, origin) = self.anchor();
        self.results.fill(entries);
        self.screen = Screen::ScanResults { owner, origin };
        self.selected = 0;
    }

    /// Show the flood screen for the highlighted leaf
    pub fn show_flooding(&mut self) {
        let (owner, origin) = self.anchor();
        self.screen = Screen::Flooding { owner, origin };
    }

    /// Show a notice anchored to the current leaf
    pub fn show_notice(&mut self, notice: Notice) {
        let (owner, origin) = self.anchor();
        self.results.clear();
        self.screen = Screen::Notice {
            owner,
            origin,
            notice,
            expires_at: None,
        };
    }

    /// Leave a transient screen for the submenu that opened it
    ///
    /// The cursor lands on the leaf that opened the screen. Returns
    /// whether the screen changed.
    pub fn return_to_owner(&mut self) -> bool {
        let Some((owner, origin)) = self.screen.anchor() else {
            return false;
        };
        self.results.clear();
        self.screen = Screen::Menu(owner);
        let count = self.item_count();
        self.selected = if origin < count { origin } else { 0 };
        true
    }

    /// Time out a notice after `notice_ms`
    ///
    /// The first call after the notice appears arms the deadline, so time
    /// spent blocked before the first poll does not count. Returns whether
    /// the screen changed.
    pub fn expire_notice(&mut self, now: Millis, notice_ms: u32) -> bool {
        let Screen::Notice { expires_at, .. } = &mut self.screen else {
            return false;
        };
        let deadline = match expires_at {
            Some(deadline) => *deadline,
            None => {
                *expires_at = Some(now.wrapping_add(notice_ms));
                return false;
            }
        };
        reached(now, deadline) && self.return_to_owner()
    }

    /// Heading of the current screen
    pub fn title(&self) -> &'static str {
        match self.screen {
            Screen::Menu(id) => self.tree.node(id).map_or("", |node| node.title),
            Screen::Scanning { .. } | Screen::ScanResults { .. } | Screen::Flooding { .. } => {
                self.leaf_label()
            }
            Screen::Notice { notice, .. } => notice.title,
        }
    }

    /// Label of the highlighted leaf, or of the leaf that opened this screen
    pub fn leaf_label(&self) -> &'static str {
        let (owner, origin) = self.anchor();
        self.tree.label(owner, origin).unwrap_or("")
    }

    /// Row labels of the current screen
    pub fn labels(&self) -> Vec<&str, MAX_VIEW_ITEMS> {
        let mut labels = Vec::new();
        match self.screen {
            Screen::Menu(id) => {
                if let Some(node) = self.tree.node(id) {
                    for item in node.items.iter().take(MAX_VIEW_ITEMS) {
                        let _ = labels.push(item.label);
                    }
                }
            }
            Screen::Scanning { .. } => extend(&mut labels, SCANNING_ITEMS),
            Screen::ScanResults { .. } => {
                for result in self.results.iter() {
                    let _ = labels.push(result.label());
                }
            }
            Screen::Flooding { .. } => extend(&mut labels, FLOODING_ITEMS),
            Screen::Notice { notice, .. } => {
                let _ = labels.push(notice.message);
            }
        }
        labels
    }

    fn enter(&mut self, node: NodeId) {
        self.screen = Screen::Menu(node);
        self.selected = 0;
    }

    /// Owner and leaf for a screen opened from here
    fn anchor(&self) -> (NodeId, usize) {
        match self.screen {
            Screen::Menu(id) => (id, self.selected),
            other => other.anchor().unwrap_or((self.tree.root, 0)),
        }
    }
}

fn extend<'a>(labels: &mut Vec<&'a str, MAX_VIEW_ITEMS>, items: &[&'a str]) {
    for item in items {
        let _ = labels.push(*item);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::menu::tree::STANDARD_MENU;
    use crate::traits::radio::Address;
    use proptest::prelude::*;

    fn model() -> MenuModel {
        MenuModel::new(&STANDARD_MENU)
    }

    /// Open the submenu at `index` of Main
    fn open(model: &mut MenuModel, index: usize) {
        for _ in 0..index {
            model.on_encoder(EncoderEvent::Right);
        }
        assert_eq!(model.on_click(), ClickOutcome::Moved);
    }

    fn entries(n: u8) -> std::vec::Vec<ScanEntry> {
        (0..n)
            .map(|i| ScanEntry::new("dev", Address([0x02, 0, 0, 0, 0, i])))
            .collect()
    }

    #[test]
    fn test_initial_state() {
        let model = model();
        assert_eq!(*model.screen(), Screen::Menu(NodeId::Main));
        assert_eq!(model.cursor(), Some(0));
        assert_eq!(model.title(), "Main");
        assert_eq!(model.labels().as_slice(), ["BLE", "WiFi", "NFC", "Settings"]);
    }

    #[test]
    fn test_main_wraps_both_ways() {
        let mut model = model();
        for _ in 0..4 {
            assert!(model.on_encoder(EncoderEvent::Right));
        }
        assert_eq!(model.cursor(), Some(0));
        model.on_encoder(EncoderEvent::Left);
        assert_eq!(model.cursor(), Some(3));
    }

    #[test]
    fn test_enter_submenu_resets_cursor() {
        let mut model = model();
        open(&mut model, 0);
        assert_eq!(*model.screen(), Screen::Menu(NodeId::Ble));
        assert_eq!(model.cursor(), Some(0));
        assert_eq!(model.labels().as_slice(), ["BLE Scanner", "Beacon Flood", "Back"]);
    }

    #[test]
    fn test_back_returns_to_parent() {
        let mut model = model();
        open(&mut model, 3);
        model.on_encoder(EncoderEvent::Right);
        assert_eq!(model.on_click(), ClickOutcome::Moved);
        assert_eq!(*model.screen(), Screen::Menu(NodeId::Main));
        assert_eq!(model.cursor(), Some(0));
    }

    #[test]
    fn test_action_dispatches() {
        let mut model = model();
        open(&mut model, 0);
        model.on_encoder(EncoderEvent::Right);
        assert_eq!(
            model.on_click(),
            ClickOutcome::Dispatch(ActionId::BeaconFlood)
        );
        // Dispatch alone does not change the screen
        assert_eq!(*model.screen(), Screen::Menu(NodeId::Ble));
    }

    #[test]
    fn test_long_press_noop_at_home() {
        let mut model = model();
        model.on_encoder(EncoderEvent::Right);
        assert!(!model.on_long_press());
        assert_eq!(model.cursor(), Some(1));
    }

    #[test]
    fn test_scan_results_flow() {
        let mut model = model();
        open(&mut model, 0);
        model.show_scanning();
        assert_eq!(model.title(), "BLE Scanner");
        assert_eq!(model.cursor(), None);

        model.show_scan_results(&entries(2));
        assert_eq!(model.labels().len(), 2);
        assert_eq!(model.cursor(), Some(0));
        model.on_encoder(EncoderEvent::Right);
        assert_eq!(model.cursor(), Some(1));

        assert_eq!(model.on_click(), ClickOutcome::Moved);
        assert_eq!(*model.screen(), Screen::Menu(NodeId::Ble));
        assert_eq!(model.cursor(), Some(0));
        assert!(model.results().is_empty());
    }

    #[test]
    fn test_empty_results_click_returns() {
        let mut model = model();
        open(&mut model, 0);
        model.show_scanning();
        model.show_scan_results(&[]);
        assert_eq!(model.cursor(), None);
        assert!(!model.on_encoder(EncoderEvent::Right));
        assert_eq!(model.on_click(), ClickOutcome::Moved);
        assert_eq!(*model.screen(), Screen::Menu(NodeId::Ble));
    }

    #[test]
    fn test_flooding_returns_to_flood_leaf() {
        let mut model = model();
        open(&mut model, 0);
        model.on_encoder(EncoderEvent::Right);
        model.show_flooding();
        assert_eq!(model.title(), "Beacon Flood");
        assert_eq!(model.on_click(), ClickOutcome::Ignored);
        assert!(!model.on_encoder(EncoderEvent::Right));

        assert!(model.return_to_owner());
        assert_eq!(*model.screen(), Screen::Menu(NodeId::Ble));
        assert_eq!(model.cursor(), Some(1));
        assert!(!model.return_to_owner());
    }

    #[test]
    fn test_notice_expires_after_timeout() {
        let mut model = model();
        open(&mut model, 2);
        model.show_notice(Notice::new("Read Tag", "NFC unavailable"));
        assert_eq!(model.labels().as_slice(), ["NFC unavailable"]);

        assert!(!model.expire_notice(5000, 1500));
        assert!(!model.expire_notice(6499, 1500));
        assert!(model.expire_notice(6500, 1500));
        assert_eq!(*model.screen(), Screen::Menu(NodeId::Nfc));
        assert!(!model.expire_notice(9000, 1500));
    }

    #[test]
    fn test_notice_click_returns() {
        let mut model = model();
        open(&mut model, 3);
        model.show_notice(Notice::new("About", "v1"));
        assert_eq!(model.on_click(), ClickOutcome::Moved);
        assert_eq!(*model.screen(), Screen::Menu(NodeId::Settings));
    }

    #[test]
    fn test_notice_after_scanning_keeps_anchor() {
        let mut model = model();
        open(&mut model, 1);
        model.show_scanning();
        model.show_notice(Notice::new("AP Scanner", "Not supported"));
        assert_eq!(model.screen().anchor(), Some((NodeId::Wifi, 0)));
    }

    #[test]
    fn test_long_press_clears_results() {
        let mut model = model();
        open(&mut model, 0);
        model.show_scanning();
        model.show_scan_results(&entries(3));
        assert!(model.on_long_press());
        assert!(model.is_home());
        assert!(model.results().is_empty());
    }

    #[derive(Debug, Clone, Copy)]
    enum Step {
        Left,
        Right,
        Click,
    }

    fn step() -> impl Strategy<Value = Step> {
        prop_oneof![Just(Step::Left), Just(Step::Right), Just(Step::Click)]
    }

    proptest! {
        #[test]
        fn test_cursor_always_valid(steps in prop::collection::vec(step(), 0..60)) {
            let mut model = model();
            for step in steps {
                match step {
                    Step::Left => { model.on_encoder(EncoderEvent::Left); }
                    Step::Right => { model.on_encoder(EncoderEvent::Right); }
                    Step::Click => {
                        if let ClickOutcome::Dispatch(_) = model.on_click() {
                            model.show_notice(Notice::new("t", "m"));
                        }
                    }
                }
                let count = model.item_count();
                if count > 0 {
                    prop_assert!(model.selected() < count);
                }
            }
        }

        #[test]
        fn test_long_press_always_reaches_home(steps in prop::collection::vec(step(), 0..40)) {
            let mut model = model();
            for step in steps {
                match step {
                    Step::Left => { model.on_encoder(EncoderEvent::Left); }
                    Step::Right => { model.on_encoder(EncoderEvent::Right); }
                    Step::Click => {
                        if let ClickOutcome::Dispatch(_) = model.on_click() {
                            model.show_flooding();
                        }
                    }
                }
            }
            let was_home = model.is_home();
            prop_assert_eq!(model.on_long_press(), !was_home);
            prop_assert_eq!(*model.screen(), Screen::Menu(NodeId::Main));
            if !was_home {
                prop_assert_eq!(model.cursor(), Some(0));
            }
        }

        #[test]
        fn test_full_turn_returns_to_start(start in 0usize..4, right in any::<bool>()) {
            let mut model = model();
            for _ in 0..start {
                model.on_encoder(EncoderEvent::Right);
            }
            let event = if right { EncoderEvent::Right } else { EncoderEvent::Left };
            for _ in 0..4 {
                model.on_encoder(event);
            }
            prop_assert_eq!(model.cursor(), Some(start));
        }
    }
}
