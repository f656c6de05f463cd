//! The in-game web: a fixed set of sites found with `search` and opened with
//! `browse`.

use rand::{seq::IndexedRandom, Rng};

static TLD: &str = "net";
static NO_DESCRIPTION: &str = "This website does not provide a description.";

/// Reels of the Mega Jackpot slot machine.
pub static SLOT_SYMBOLS: &[&str] = &["💍", "🍒", "💎", "🔔", "👑", "🍀", "🍉"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Website {
    pub id: &'static str,
    pub title: &'static str,
    pub keywords: &'static [&'static str],
    pub description: &'static str,
    /// Page body in markup.
    pub content: &'static str,
}

impl Website {
    pub fn domain(&self) -> String {
        format!("{}.{}", self.id, TLD)
    }

    /// A link to this site as shown in search results.
    pub fn link(&self) -> String {
        format!(
            "[@click=app.link('{}')]{}[/] ({})\n{}\n",
            self.id,
            self.title,
            self.domain(),
            self.description
        )
    }

    /// The full page: domain header, then the content.
    pub fn page(&self) -> String {
        format!("[dim]<- {}[/]\n\n{}", self.domain(), self.content)
    }

    fn matches(&self, terms: &[&str]) -> bool {
        terms.iter().any(|term| self.keywords.contains(term))
    }
}

static WEBSITES: &[Website] = &[
    Website {
        id: "search",
        title: "Search",
        keywords: &["search", "web"],
        description: "Your favourite web search engine.",
        content: "[bold]SEARCH[/]\nType [bold]search <terms>[/] to search the web.",
    },
    Website {
        id: "slot_machine",
        title: "Mega Jackpot",
        keywords: &["jackpot", "mega", "gambling", "luck", "slot", "machine"],
        description: NO_DESCRIPTION,
        content: "[bold]MEGA JACKPOT[/]\n💍 🍒 💎\nType [bold]spin[/] to try your luck.",
    },
    Website {
        id: "example",
        title: "Example",
        keywords: &["test", "example"],
        description: NO_DESCRIPTION,
        content: "[@click=app.link('slot_machine')]Try your luck![/] (slot_machine.net)",
    },
];

/// Every site, in registry order.
pub fn all() -> &'static [Website] {
    WEBSITES
}

/// Look a site up by id or by domain.
pub fn find(address: &str) -> Option<&'static Website> {
    let id = address
        .strip_suffix(TLD)
        .and_then(|rest| rest.strip_suffix('.'))
        .unwrap_or(address);
    WEBSITES.iter().find(|site| site.id == id)
}

/// Sites sharing at least one keyword with `query`.
pub fn search(query: &str) -> Vec<&'static Website> {
    let terms: Vec<&str> = query.split_whitespace().collect();
    WEBSITES.iter().filter(|site| site.matches(&terms)).collect()
}

/// Pull the three reels.
pub fn spin<R: Rng + ?Sized>(rng: &mut R) -> [&'static str; 3] {
    std::array::from_fn(|_| SLOT_SYMBOLS.choose(&mut *rng).copied().unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_search_matches_any_keyword() {
        let ids = |query: &str| search(query).iter().map(|site| site.id).collect::<Vec<_>>();

        assert_eq!(ids("web"), vec!["search"]);
        assert_eq!(ids("cheap luck example"), vec!["slot_machine", "example"]);
        assert!(ids("Luck").is_empty());
        assert!(ids("").is_empty());
    }

    #[test]
    fn test_find_by_id_or_domain() {
        assert_eq!(find("slot_machine").map(|s| s.title), Some("Mega Jackpot"));
        assert_eq!(find("example.net").map(|s| s.id), Some("example"));
        assert!(find("nowhere").is_none());
        assert!(find("net").is_none());
    }

    #[test]
    fn test_links_point_at_registered_sites() {
        for site in all() {
            assert!(site.link().contains(&format!("app.link('{}')", site.id)));
            assert!(site.page().contains(&site.domain()));
        }
        assert!(find("example")
            .is_some_and(|site| site.content.contains("app.link('slot_machine')")));
    }

    #[test]
    fn test_spin_is_driven_by_the_rng() {
        // Arrange
        let mut first = StdRng::seed_from_u64(7);
        let mut second = StdRng::seed_from_u64(7);

        // Act
        let reels = spin(&mut first);

        // Assert
        assert_eq!(reels, spin(&mut second));
        assert!(reels.iter().all(|symbol| SLOT_SYMBOLS.contains(symbol)));
    }

    #[test]
    fn test_spin_eventually_shows_every_symbol() {
        let mut rng = StdRng::seed_from_u64(42);
        let seen: std::collections::BTreeSet<&str> =
            (0..200).flat_map(|_| spin(&mut rng)).collect();

        assert_eq!(seen.len(), SLOT_SYMBOLS.len());
    }
}
