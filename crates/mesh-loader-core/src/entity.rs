/// Firmware variant the loader hands control to.
///
/// Persisted as a single boolean flag where `true` means [`Selection::Meshcore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    Meshcore,
    Meshtastic,
}

impl Selection {
    /// The other variant
    pub const fn toggled(self) -> Self {
        match self {
            Selection::Meshcore => Selection::Meshtastic,
            Selection::Meshtastic => Selection::Meshcore,
        }
    }

    /// Label rendered on the selection and boot screens
    pub const fn label(self) -> &'static str {
        match self {
            Selection::Meshcore => "Meshcore",
            Selection::Meshtastic => "Meshtastic",
        }
    }

    pub const fn from_flag(meshcore: bool) -> Self {
        if meshcore {
            Selection::Meshcore
        } else {
            Selection::Meshtastic
        }
    }

    pub const fn as_flag(self) -> bool {
        matches!(self, Selection::Meshcore)
    }

    /// Boot slot holding the image of this variant
    pub const fn boot_slot(self) -> BootSlot {
        match self {
            Selection::Meshcore => BootSlot::Ota0,
            Selection::Meshtastic => BootSlot::Ota1,
        }
    }
}

/// Application slot in the partition table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootSlot {
    Ota0,
    Ota1,
}

impl BootSlot {
    pub const fn index(self) -> u8 {
        match self {
            BootSlot::Ota0 => 0,
            BootSlot::Ota1 => 1,
        }
    }
}

impl From<Selection> for BootSlot {
    fn from(selection: Selection) -> Self {
        selection.boot_slot()
    }
}
