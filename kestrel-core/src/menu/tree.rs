//! Static menu tree

/// Menu node identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NodeId {
    Main,
    Ble,
    Wifi,
    Nfc,
    Settings,
}

/// Actions a leaf can dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ActionId {
    /// Blocking BLE device scan
    BleScan,
    /// Resumable advertisement flood
    BeaconFlood,
    /// Blocking access point scan
    WifiScan,
    /// NFC tag read (no reader fitted)
    NfcRead,
    /// Firmware name and version
    About,
}

impl ActionId {
    /// Whether the action runs as a task across polls instead of
    /// completing inline
    pub const fn is_resumable(self) -> bool {
        matches!(self, Self::BeaconFlood)
    }

    /// Whether the action blocks the loop for a bounded time
    pub const fn is_blocking(self) -> bool {
        matches!(self, Self::BleScan | Self::WifiScan)
    }
}

/// What selecting an item does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ItemKind {
    /// Open a child menu
    Submenu(NodeId),
    /// Run an action
    Action(ActionId),
    /// Return to the parent menu
    Back,
}

/// One selectable menu entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuItem {
    pub label: &'static str,
    pub kind: ItemKind,
}

impl MenuItem {
    pub const fn submenu(label: &'static str, node: NodeId) -> Self {
        Self {
            label,
            kind: ItemKind::Submenu(node),
        }
    }

    pub const fn action(label: &'static str, action: ActionId) -> Self {
        Self {
            label,
            kind: ItemKind::Action(action),
        }
    }

    pub const fn back() -> Self {
        Self {
            label: "Back",
            kind: ItemKind::Back,
        }
    }
}

/// A menu screen and its entries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuNode {
    pub id: NodeId,
    pub title: &'static str,
    /// Lookup only; used by `Back` entries
    pub parent: Option<NodeId>,
    pub items: &'static [MenuItem],
}

/// Immutable menu tree
#[derive(Debug, Clone, Copy)]
pub struct MenuTree {
    pub root: NodeId,
    nodes: &'static [MenuNode],
}

impl MenuTree {
    pub const fn new(root: NodeId, nodes: &'static [MenuNode]) -> Self {
        Self { root, nodes }
    }

    /// Look up a node by id
    pub fn node(&self, id: NodeId) -> Option<&'static MenuNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    /// Label of item `index` in node `id`
    pub fn label(&self, id: NodeId, index: usize) -> Option<&'static str> {
        self.node(id)
            .and_then(|node| node.items.get(index))
            .map(|item| item.label)
    }

    pub fn nodes(&self) -> &'static [MenuNode] {
        self.nodes
    }
}

const MAIN_ITEMS: &[MenuItem] = &[
    MenuItem::submenu("BLE", NodeId::Ble),
    MenuItem::submenu("WiFi", NodeId::Wifi),
    MenuItem::submenu("NFC", NodeId::Nfc),
    MenuItem::submenu("Settings", NodeId::Settings),
];

const BLE_ITEMS: &[MenuItem] = &[
    MenuItem::action("BLE Scanner", ActionId::BleScan),
    MenuItem::action("Beacon Flood", ActionId::BeaconFlood),
    MenuItem::back(),
];

const WIFI_ITEMS: &[MenuItem] = &[
    MenuItem::action("AP Scanner", ActionId::WifiScan),
    MenuItem::back(),
];

const NFC_ITEMS: &[MenuItem] = &[
    MenuItem::action("Read Tag", ActionId::NfcRead),
    MenuItem::back(),
];

const SETTINGS_ITEMS: &[MenuItem] = &[MenuItem::action("About", ActionId::About), MenuItem::back()];

const NODES: &[MenuNode] = &[
    MenuNode {
        id: NodeId::Main,
        title: "Main",
        parent: None,
        items: MAIN_ITEMS,
    },
    MenuNode {
        id: NodeId::Ble,
        title: "BLE",
        parent: Some(NodeId::Main),
        items: BLE_ITEMS,
    },
    MenuNode {
        id: NodeId::Wifi,
        title: "WiFi",
        parent: Some(NodeId::Main),
        items: WIFI_ITEMS,
    },
    MenuNode {
        id: NodeId::Nfc,
        title: "NFC",
        parent: Some(NodeId::Main),
        items: NFC_ITEMS,
    },
    MenuNode {
        id: NodeId::Settings,
        title: "Settings",
        parent: Some(NodeId::Main),
        items: SETTINGS_ITEMS,
    },
];

/// The device menu
pub static STANDARD_MENU: MenuTree = MenuTree::new(NodeId::Main, NODES);
