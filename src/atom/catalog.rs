use serde::{Deserialize, Serialize};

/// The three particle families a Bohr diagram draws as separate shells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShellKind {
    Electron,
    Proton,
    Neutron,
}

/// Which local axes a shell group spins around each frame.
///
/// The Z axis always turns at double the shell's angular speed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisFlags {
    pub x: bool,
    pub y: bool,
    pub z: bool,
}

impl AxisFlags {
    pub const fn new(x: bool, y: bool, z: bool) -> Self {
        Self { x, y, z }
    }
}

/// Parameters for one circular shell of identical particles.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShellSpec {
    pub kind: ShellKind,
    pub color: [f32; 3],
    pub angular_speed: f32,
    pub shell_radius: f32,
    pub particle_count: u32,
    pub particle_size: f32,
    pub axes: AxisFlags,
}

/// One selectable element with its three shell parameter sets.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct ElementEntry {
    pub symbol: &'static str,
    pub atomic_number: &'static str,
    pub name: &'static str,
    pub atomic_mass: &'static str,
    pub electron: ShellSpec,
    pub proton: ShellSpec,
    pub neutron: ShellSpec,
}

impl ElementEntry {
    /// Shells in render order: electron, proton, neutron.
    pub fn shells(&self) -> [&ShellSpec; 3] {
        [&self.electron, &self.proton, &self.neutron]
    }
}

const ELECTRON_COLOR: [f32; 3] = rgb8(0x26, 0x67, 0xff);
const PROTON_COLOR: [f32; 3] = rgb8(0x00, 0x80, 0x00);
const NEUTRON_COLOR: [f32; 3] = rgb8(0xff, 0xff, 0xff);

const fn rgb8(r: u8, g: u8, b: u8) -> [f32; 3] {
    [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0]
}

const fn electron_shell(count: u32) -> ShellSpec {
    ShellSpec {
        kind: ShellKind::Electron,
        color: ELECTRON_COLOR,
        angular_speed: 0.0035,
        shell_radius: 13.0,
        particle_count: count,
        particle_size: 0.02,
        axes: AxisFlags::new(true, false, true),
    }
}

const fn proton_shell(count: u32) -> ShellSpec {
    ShellSpec {
        kind: ShellKind::Proton,
        color: PROTON_COLOR,
        angular_speed: 0.002,
        shell_radius: 7.0,
        particle_count: count,
        particle_size: 0.03,
        axes: AxisFlags::new(true, true, false),
    }
}

const fn neutron_shell(count: u32, size: f32) -> ShellSpec {
    ShellSpec {
        kind: ShellKind::Neutron,
        color: NEUTRON_COLOR,
        angular_speed: 0.002,
        shell_radius: 5.0,
        particle_count: count,
        particle_size: size,
        axes: AxisFlags::new(true, false, false),
    }
}

const ELEMENTS: [ElementEntry; 5] = [
    ElementEntry {
        symbol: "H",
        atomic_number: "1",
        name: "Hydrogen",
        atomic_mass: "1.0007 u",
        electron: electron_shell(1),
        proton: proton_shell(1),
        neutron: neutron_shell(0, 0.025),
    },
    ElementEntry {
        symbol: "He",
        atomic_number: "2",
        name: "Helium",
        atomic_mass: "4.002602 u",
        electron: electron_shell(2),
        proton: proton_shell(2),
        neutron: neutron_shell(2, 0.025),
    },
    ElementEntry {
        symbol: "C",
        atomic_number: "6",
        name: "Carbon",
        atomic_mass: "12.0096 u",
        electron: electron_shell(6),
        proton: proton_shell(6),
        // Carbon's neutron size differs from the shared 0.025; kept as
        // literal per-entry data.
        neutron: neutron_shell(6, 0.04),
    },
    ElementEntry {
        symbol: "Ne",
        atomic_number: "10",
        name: "Neon",
        atomic_mass: "20.18 u",
        electron: electron_shell(10),
        proton: proton_shell(10),
        neutron: neutron_shell(10, 0.025),
    },
    ElementEntry {
        symbol: "Mg",
        atomic_number: "12",
        name: "Magnesium",
        atomic_mass: "24.31 u",
        electron: electron_shell(12),
        proton: proton_shell(12),
        neutron: neutron_shell(12, 0.025),
    },
];

pub fn lookup(symbol: &str) -> Option<&'static ElementEntry> {
    ELEMENTS.iter().find(|entry| entry.symbol == symbol)
}

/// Hydrogen, the initial selection.
pub fn default_entry() -> &'static ElementEntry {
    &ELEMENTS[0]
}

pub fn all() -> &'static [ElementEntry] {
    &ELEMENTS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn electron_and_proton_counts_match_atomic_number() {
        for entry in all() {
            let z: u32 = entry.atomic_number.parse().unwrap();
            assert_eq!(entry.electron.particle_count, z, "{}", entry.symbol);
            assert_eq!(entry.proton.particle_count, z, "{}", entry.symbol);
        }
    }

    #[test]
    fn neutron_counts_match_reference_isotopes() {
        let expected: [(&str, u32); 5] =
            [("H", 0), ("He", 2), ("C", 6), ("Ne", 10), ("Mg", 12)];
        for (symbol, neutrons) in expected {
            let entry = lookup(symbol).unwrap();
            assert_eq!(entry.neutron.particle_count, neutrons);
        }
    }

    #[test]
    fn symbols_are_unique() {
        for (i, a) in all().iter().enumerate() {
            for b in &all()[i + 1..] {
                assert_ne!(a.symbol, b.symbol);
            }
        }
    }

    #[test]
    fn lookup_unknown_symbol_is_none() {
        assert!(lookup("Xe").is_none());
        assert!(lookup("").is_none());
    }

    #[test]
    fn default_entry_is_hydrogen() {
        assert_eq!(default_entry().symbol, "H");
    }

    #[test]
    fn carbon_neutron_size_override() {
        assert_eq!(lookup("C").unwrap().neutron.particle_size, 0.04);
        assert_eq!(lookup("Ne").unwrap().neutron.particle_size, 0.025);
    }

    #[test]
    fn rotation_axes_follow_shell_kind() {
        for entry in all() {
            assert_eq!(entry.electron.axes, AxisFlags::new(true, false, true));
            assert_eq!(entry.proton.axes, AxisFlags::new(true, true, false));
            assert_eq!(entry.neutron.axes, AxisFlags::new(true, false, false));
        }
    }
}
