//! Simulation report generation.

use std::collections::BTreeMap;

use serde::Serialize;

use super::runner::RunStats;

/// Aggregated results from multiple simulation runs.
#[derive(Debug, Clone, Serialize)]
pub struct SimReport {
    pub num_runs: u32,
    pub days: u32,

    // Aggregated stats
    pub avg_final_level: f64,
    pub avg_max_level: f64,
    pub avg_ascensions: f64,
    pub avg_gear_level: f64,
    pub avg_home_level: f64,
    pub avg_artifacts: f64,
    pub avg_quests: f64,
    pub quest_success_rate: f64,
    pub encounter_win_rate: f64,
    pub avg_deaths: f64,

    // Distribution data
    pub level_distribution: BTreeMap<u32, u32>,
    /// Average in-game day each level was first reached, over the runs that reached it.
    pub avg_day_per_level: BTreeMap<u32, f64>,

    // Individual run stats for detailed analysis
    #[serde(skip)]
    pub run_stats: Vec<RunStats>,
}

fn average(runs: &[RunStats], f: impl Fn(&RunStats) -> f64) -> f64 {
    if runs.is_empty() {
        return 0.0;
    }
    runs.iter().map(f).sum::<f64>() / runs.len() as f64
}

fn ratio(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

impl SimReport {
    /// Create a new report from completed run stats.
    pub fn from_runs(runs: Vec<RunStats>, days: u32) -> Self {
        let quests: u64 = runs.iter().map(|r| r.quests_attempted).sum();
        let successes: u64 = runs.iter().map(|r| r.quests_succeeded).sum();
        let encounters: u64 = runs.iter().map(|r| r.encounters).sum();
        let victories: u64 = runs.iter().map(|r| r.victories).sum();

        let mut level_distribution = BTreeMap::new();
        for run in &runs {
            *level_distribution.entry(run.final_level).or_insert(0) += 1;
        }

        // First time each level was reached, per run
        let mut level_days: BTreeMap<u32, Vec<f64>> = BTreeMap::new();
        for run in &runs {
            let mut seen = BTreeMap::new();
            for &(level, day) in &run.level_up_days {
                seen.entry(level).or_insert(day);
            }
            for (level, day) in seen {
                level_days.entry(level).or_default().push(day);
            }
        }
        let avg_day_per_level = level_days
            .into_iter()
            .map(|(level, days)| (level, days.iter().sum::<f64>() / days.len() as f64))
            .collect();

        Self {
            num_runs: runs.len() as u32,
            days,
            avg_final_level: average(&runs, |r| r.final_level as f64),
            avg_max_level: average(&runs, |r| r.max_level as f64),
            avg_ascensions: average(&runs, |r| r.ascensions as f64),
            avg_gear_level: average(&runs, |r| r.gear_level as f64),
            avg_home_level: average(&runs, |r| r.home_level as f64),
            avg_artifacts: average(&runs, |r| r.artifacts as f64),
            avg_quests: average(&runs, |r| r.quests_attempted as f64),
            quest_success_rate: ratio(successes, quests),
            encounter_win_rate: ratio(victories, encounters),
            avg_deaths: average(&runs, |r| r.deaths as f64),
            level_distribution,
            avg_day_per_level,
            run_stats: runs,
        }
    }

    /// Generate a text report.
    pub fn to_text(&self) -> String {
        let mut report = String::new();

        report.push_str("═══════════════════════════════════════════════════════════════\n");
        report.push_str("                    SIMULATION REPORT\n");
        report.push_str("═══════════════════════════════════════════════════════════════\n\n");

        report.push_str(&format!(
            "Runs: {} over {} in-game days each\n\n",
            self.num_runs, self.days
        ));

        report.push_str("── PROGRESSION ──────────────────────────────────────────────────\n");
        report.push_str(&format!("  Avg Final Level:     {:.1}\n", self.avg_final_level));
        report.push_str(&format!("  Avg Max Level:       {:.1}\n", self.avg_max_level));
        report.push_str(&format!("  Avg Ascensions:      {:.2}\n", self.avg_ascensions));
        report.push_str(&format!("  Avg Gear Level:      {:.1}\n", self.avg_gear_level));
        report.push_str(&format!("  Avg Home Level:      {:.1}\n", self.avg_home_level));
        report.push_str(&format!("  Avg Artifacts:       {:.2}\n\n", self.avg_artifacts));

        report.push_str("── QUESTS & COMBAT ──────────────────────────────────────────────\n");
        report.push_str(&format!("  Avg Quests:          {:.1}\n", self.avg_quests));
        report.push_str(&format!(
            "  Quest Success Rate:  {:.1}%\n",
            self.quest_success_rate * 100.0
        ));
        report.push_str(&format!(
            "  Encounter Win Rate:  {:.1}%\n",
            self.encounter_win_rate * 100.0
        ));
        report.push_str(&format!("  Avg Deaths:          {:.1}\n\n", self.avg_deaths));

        report.push_str("── FINAL LEVELS ─────────────────────────────────────────────────\n");
        for (level, count) in &self.level_distribution {
            let pct = (*count as f64 / self.num_runs.max(1) as f64) * 100.0;
            let bar: String = "█".repeat((pct / 5.0) as usize);
            report.push_str(&format!("  Lv {:3}: {:>5.1}% {}\n", level, pct, bar));
        }
        report.push('\n');

        report.push_str("── BALANCE ASSESSMENT ───────────────────────────────────────────\n");
        let rating = if self.quest_success_rate > 0.9 {
            "TOO EASY - Quests almost never fail"
        } else if self.quest_success_rate > 0.5 {
            "GOOD - Most quests succeed"
        } else if self.quest_success_rate > 0.25 {
            "HARD - Most quests fail"
        } else {
            "TOO HARD - Players are stuck"
        };
        report.push_str(&format!("  Quest Rating:    {}\n", rating));
        if self.encounter_win_rate < 0.5 {
            report.push_str("  ⚠️  Players lose most encounters - monster damage too high?\n");
        }

        report.push_str("\n═══════════════════════════════════════════════════════════════\n");

        report
    }

    /// Level-up pacing table.
    pub fn level_curve_text(&self) -> String {
        let mut text = String::from("── LEVEL CURVE ──────────────────────────────────────────────────\n");
        text.push_str("  Level    Avg Day\n");
        for (level, day) in &self.avg_day_per_level {
            text.push_str(&format!("  {:5}    {:7.1}\n", level, day));
        }
        text
    }

    /// Generate a JSON report for further analysis.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
