// Wire types for the two JSON collaborators.
//   FanGraphs leaderboard: {fangraphs}/api/leaders/major-league/data
//   MLB Stats API:         {statsapi}/api/v1/{teams,teams/stats,standings,schedule}
use serde::Deserialize;

// ---------------------------------------------------------------------------
// FanGraphs
// ---------------------------------------------------------------------------

/// Team-level leaderboard. Column names vary by season, so rows stay untyped.
#[derive(Deserialize, Default, Debug)]
pub struct LeaderboardResponse {
    #[serde(default)]
    pub data: Vec<serde_json::Map<String, serde_json::Value>>,
}

// ---------------------------------------------------------------------------
// MLB Stats API
// ---------------------------------------------------------------------------

#[derive(Deserialize, Default, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TeamRef {
    pub id: u32,
    #[serde(default)]
    pub name: String,
    pub abbreviation: Option<String>,
    pub division: Option<DivisionRef>,
}

#[derive(Deserialize, Default, Debug, Clone, PartialEq)]
pub struct DivisionRef {
    pub id: u32,
    pub name: Option<String>,
}

#[derive(Deserialize, Default, Debug)]
pub struct TeamsResponse {
    #[serde(default)]
    pub teams: Vec<TeamRef>,
}

#[derive(Deserialize, Default, Debug)]
pub struct TeamStatsResponse {
    #[serde(default)]
    pub stats: Vec<StatGroup>,
}

#[derive(Deserialize, Default, Debug)]
pub struct StatGroup {
    #[serde(default)]
    pub splits: Vec<StatSplit>,
}

#[derive(Deserialize, Default, Debug)]
pub struct StatSplit {
    pub team: Option<TeamRef>,
    /// Mix of numbers and numeric strings (`".254"`, `"1445.2"`).
    #[serde(default)]
    pub stat: serde_json::Map<String, serde_json::Value>,
}

#[derive(Deserialize, Default, Debug)]
pub struct StandingsResponse {
    #[serde(default)]
    pub records: Vec<DivisionRecord>,
}

#[derive(Deserialize, Default, Debug)]
#[serde(rename_all = "camelCase")]
pub struct DivisionRecord {
    pub division: Option<DivisionRef>,
    #[serde(default)]
    pub team_records: Vec<TeamRecord>,
}

#[derive(Deserialize, Default, Debug)]
#[serde(rename_all = "camelCase")]
pub struct TeamRecord {
    pub team: TeamRef,
    pub wins: u16,
    pub losses: u16,
    /// `"-"` for the division leader.
    #[serde(default)]
    pub games_back: String,
    pub division_rank: Option<String>,
    pub wild_card_rank: Option<String>,
    pub wild_card_games_back: Option<String>,
    pub elimination_number: Option<String>,
    pub wild_card_elimination_number: Option<String>,
}

#[derive(Deserialize, Default, Debug)]
pub struct ScheduleResponse {
    #[serde(default)]
    pub dates: Vec<ScheduleDate>,
}

#[derive(Deserialize, Default, Debug)]
pub struct ScheduleDate {
    pub date: String,
    #[serde(default)]
    pub games: Vec<ScheduleGame>,
}

#[derive(Deserialize, Default, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleGame {
    pub game_pk: u64,
    /// `YYYY-MM-DD` in the home club's time zone.
    pub official_date: Option<String>,
    #[serde(default)]
    pub game_date: String,
    pub status: GameStatus,
    pub teams: GameTeams,
    pub game_info: Option<GameInfo>,
    /// `"N"`, `"Y"` (traditional) or `"S"` (split).
    pub double_header: Option<String>,
    pub game_number: Option<u8>,
}

#[derive(Deserialize, Default, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GameStatus {
    /// `Preview`, `Live` or `Final`.
    #[serde(default)]
    pub abstract_game_state: String,
    #[serde(default)]
    pub detailed_state: String,
}

#[derive(Deserialize, Default, Debug, Clone, PartialEq)]
pub struct GameTeams {
    pub away: GameSide,
    pub home: GameSide,
}

#[derive(Deserialize, Default, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GameSide {
    pub team: TeamRef,
    pub score: Option<u16>,
    pub is_winner: Option<bool>,
    pub league_record: Option<LeagueRecord>,
}

#[derive(Deserialize, Default, Debug, Clone, PartialEq)]
pub struct LeagueRecord {
    pub wins: u16,
    pub losses: u16,
}

#[derive(Deserialize, Default, Debug, Clone, PartialEq)]
pub struct GameInfo {
    pub attendance: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schedule_game_deserializes_final_and_preview() {
        let body = r#"{"dates":[{"date":"2024-04-01","games":[
            {"gamePk":745000,"officialDate":"2024-04-01","gameDate":"2024-04-01T18:20:00Z",
             "status":{"abstractGameState":"Final","detailedState":"Final"},
             "teams":{"away":{"team":{"id":115,"name":"Colorado Rockies"},"score":5,"isWinner":false,
                              "leagueRecord":{"wins":1,"losses":3}},
                      "home":{"team":{"id":112,"name":"Chicago Cubs"},"score":9,"isWinner":true,
                              "leagueRecord":{"wins":3,"losses":1}}},
             "gameInfo":{"attendance":40001},"doubleHeader":"N","gameNumber":1},
            {"gamePk":745001,"gameDate":"2024-04-02T18:20:00Z",
             "status":{"abstractGameState":"Preview","detailedState":"Scheduled"},
             "teams":{"away":{"team":{"id":115}},"home":{"team":{"id":112}}}}
        ]}]}"#;
        let parsed: ScheduleResponse = serde_json::from_str(body).unwrap();
        let games = &parsed.dates[0].games;
        assert_eq!(games.len(), 2);
        assert_eq!(games[0].teams.home.is_winner, Some(true));
        assert_eq!(games[0].game_info.as_ref().and_then(|g| g.attendance), Some(40001));
        assert_eq!(games[1].official_date, None);
        assert_eq!(games[1].teams.home.score, None);
    }

    #[test]
    fn team_record_tolerates_missing_wildcard_fields() {
        let body = r#"{"records":[{"division":{"id":201},"teamRecords":[
            {"team":{"id":147,"name":"New York Yankees"},"wins":94,"losses":68,
             "gamesBack":"-","divisionRank":"1"}]}]}"#;
        let parsed: StandingsResponse = serde_json::from_str(body).unwrap();
        let rec = &parsed.records[0].team_records[0];
        assert_eq!(rec.games_back, "-");
        assert_eq!(rec.wild_card_rank, None);
        assert_eq!(parsed.records[0].division.as_ref().map(|d| d.id), Some(201));
    }
}
