use std::{fmt, str::FromStr};

use rand::Rng;

use crate::{error::AddressError, fs::FileSystem, parser};

/// Net Protocol v5 address, rendered as eight hex bytes separated by dots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NetAddress(u64);

impl NetAddress {
    pub const fn new(address: u64) -> Self {
        Self(address)
    }
}

impl From<u64> for NetAddress {
    fn from(address: u64) -> Self {
        Self(address)
    }
}

impl FromStr for NetAddress {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parser::parse_address(s).map(Self)
    }
}

impl fmt::Display for NetAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let groups: Vec<String> = self
            .0
            .to_be_bytes()
            .iter()
            .map(|byte| format!("{byte:02X}"))
            .collect();
        f.write_str(&groups.join("."))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceKind {
    /// Generic PC
    Terminal,
    Cyberdeck,
    Server,
    Implant,
    Vehicle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Manufacturer {
    Outel,
    Bmd,
    Cyclops,
    Acron,
}

impl fmt::Display for Manufacturer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Manufacturer::Outel => "Outel",
            Manufacturer::Bmd => "BMD",
            Manufacturer::Cyclops => "Cyclops",
            Manufacturer::Acron => "Acron",
        };
        f.write_str(name)
    }
}

/// A simulated computer somewhere on the network.
#[derive(Debug, Clone)]
pub struct Device {
    pub name: String,
    address: NetAddress,
    pub file_system: FileSystem,
    pub kind: DeviceKind,
    pub manufacturer: Manufacturer,
    pub model: String,
    pub username: String,
    pub password: String,
    /// Prompt template; `{user}`, `{name}`, `{path}` and `{player}` are
    /// substituted when rendered.
    pub prompt: String,
}

impl Device {
    /// A generic terminal with an `admin`/`admin` login.
    pub fn generic(name: impl Into<String>, address: NetAddress) -> Self {
        Self::generic_with_rng(name, address, &mut rand::rng())
    }

    pub fn generic_with_rng<R: Rng>(
        name: impl Into<String>,
        address: NetAddress,
        rng: &mut R,
    ) -> Self {
        Self {
            name: name.into(),
            address,
            file_system: FileSystem::with_default_layout(rng),
            kind: DeviceKind::Terminal,
            manufacturer: Manufacturer::Acron,
            model: "PowerTerm".into(),
            username: "admin".into(),
            password: "admin".into(),
            prompt: "[green]{user}@{name}:{path} $[/] ".into(),
        }
    }

    /// The player's own machine.
    pub fn oracle() -> Self {
        Self {
            name: "oracle".into(),
            manufacturer: Manufacturer::Cyclops,
            username: "sh4d0w".into(),
            prompt: concat!(
                "[$primary]┌([#00FF00]{player}[/]@[#D2691E]oracle[/])-([#FF0000]{path}[/])[/]\n",
                "[$primary]└──$[/] "
            )
            .into(),
            ..Self::generic("oracle", NetAddress::new(19391048))
        }
    }

    pub fn address(&self) -> NetAddress {
        self.address
    }

    /// Fill in the prompt template for the current state of the device.
    pub fn render_prompt(&self, player: &str) -> String {
        self.prompt
            .replace("{user}", &self.username)
            .replace("{name}", &self.name)
            .replace("{path}", &self.file_system.pwd())
            .replace("{player}", player)
    }

    /// Key/value lines shown by `ofetch`.
    pub fn sysinfo(&self) -> Vec<(&'static str, String)> {
        let os = match self.manufacturer {
            Manufacturer::Cyclops => "oracleOS v1.17",
            _ => "CyclopsOS 3.2",
        };
        vec![
            ("OS", os.to_string()),
            ("Host", format!("{} {}", self.manufacturer, self.model)),
            ("Kernel", "0.15.8.34".to_string()),
            ("Shell", "bosh 5.1.4".to_string()),
            ("CPU", "Cyclops i803 (8) @ 1.799GHz".to_string()),
            ("Memory", "198MiB / 7812MiB".to_string()),
        ]
    }
}
