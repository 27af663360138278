use serde::{Deserialize, Serialize};

/// `(abbreviation, full name, provider aliases)`. Aliases include the names
/// and codes a club carried in earlier seasons.
const MLB_TEAMS: [(&str, &str, &[&str]); 30] = [
    ("ARI", "Arizona Diamondbacks", &["AZ"]),
    ("ATL", "Atlanta Braves", &[]),
    ("BAL", "Baltimore Orioles", &[]),
    ("BOS", "Boston Red Sox", &[]),
    ("CHC", "Chicago Cubs", &[]),
    ("CWS", "Chicago White Sox", &["CHW"]),
    ("CIN", "Cincinnati Reds", &[]),
    ("CLE", "Cleveland Guardians", &["Cleveland Indians"]),
    ("COL", "Colorado Rockies", &[]),
    ("DET", "Detroit Tigers", &[]),
    ("HOU", "Houston Astros", &[]),
    ("KCR", "Kansas City Royals", &["KC"]),
    ("LAA", "Los Angeles Angels", &["ANA", "Anaheim Angels", "Los Angeles Angels of Anaheim"]),
    ("LAD", "Los Angeles Dodgers", &[]),
    ("MIA", "Miami Marlins", &["FLA", "Florida Marlins"]),
    ("MIL", "Milwaukee Brewers", &[]),
    ("MIN", "Minnesota Twins", &[]),
    ("NYM", "New York Mets", &[]),
    ("NYY", "New York Yankees", &[]),
    ("OAK", "Oakland Athletics", &["ATH", "Athletics"]),
    ("PHI", "Philadelphia Phillies", &[]),
    ("PIT", "Pittsburgh Pirates", &[]),
    ("SDP", "San Diego Padres", &["SD"]),
    ("SFG", "San Francisco Giants", &["SF"]),
    ("SEA", "Seattle Mariners", &[]),
    ("STL", "St. Louis Cardinals", &[]),
    ("TBR", "Tampa Bay Rays", &["TB", "TBD", "Tampa Bay Devil Rays"]),
    ("TEX", "Texas Rangers", &[]),
    ("TOR", "Toronto Blue Jays", &[]),
    ("WSN", "Washington Nationals", &["WSH", "WAS", "MON", "Montreal Expos"]),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub abbreviation: String,
    pub name: String,
    pub aliases: Vec<String>,
}

impl Team {
    /// True when `key` names this club by abbreviation, full name or alias.
    pub fn matches(&self, key: &str) -> bool {
        let key = key.trim();
        self.abbreviation.eq_ignore_ascii_case(key)
            || self.name.eq_ignore_ascii_case(key)
            || self.aliases.iter().any(|a| a.eq_ignore_ascii_case(key))
    }
}

/// Built once at startup and shared behind an `Arc`; never mutated afterwards.
#[derive(Debug, Clone)]
pub struct TeamDirectory {
    teams: Vec<Team>,
}

impl Default for TeamDirectory {
    fn default() -> Self {
        Self::mlb()
    }
}

impl TeamDirectory {
    pub fn mlb() -> Self {
        let teams = MLB_TEAMS
            .iter()
            .map(|(abbr, name, aliases)| Team {
                abbreviation: (*abbr).to_owned(),
                name: (*name).to_owned(),
                aliases: aliases.iter().map(|a| (*a).to_owned()).collect(),
            })
            .collect();
        Self { teams }
    }

    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    pub fn by_abbreviation(&self, abbreviation: &str) -> Option<&Team> {
        self.teams
            .iter()
            .find(|t| t.abbreviation.eq_ignore_ascii_case(abbreviation.trim()))
    }

    pub fn by_name(&self, name: &str) -> Option<&Team> {
        self.teams
            .iter()
            .find(|t| t.name.eq_ignore_ascii_case(name.trim()))
    }

    /// Abbreviation, full name, or any provider alias.
    pub fn resolve(&self, key: &str) -> Option<&Team> {
        self.by_abbreviation(key)
            .or_else(|| self.by_name(key))
            .or_else(|| self.teams.iter().find(|t| t.matches(key)))
    }

    pub fn index_of(&self, team: &Team) -> Option<usize> {
        self.teams.iter().position(|t| t.abbreviation == team.abbreviation)
    }
}
