use std::path::Path;
use std::sync::mpsc::{Receiver, Sender};
use std::thread::{self, JoinHandle};

use crate::export::export_leaderboard;
use crate::pipeline::SeasonPipeline;
use crate::season::SeasonId;
use crate::source::PageSource;
use crate::state::{Delta, LEADERBOARD_SIZE, ProviderCommand};

/// Runs season loads and exports off the UI thread. The thread exits once every
/// command sender is dropped.
pub fn spawn_provider<S>(
    pipeline: SeasonPipeline<S>,
    tx: Sender<Delta>,
    cmd_rx: Receiver<ProviderCommand>,
) -> JoinHandle<()>
where
    S: PageSource + Send + 'static,
{
    thread::spawn(move || {
        while let Ok(first) = cmd_rx.recv() {
            let mut batch = vec![first];
            batch.extend(cmd_rx.try_iter());
            for cmd in coalesce(batch) {
                if !handle_command(&pipeline, &tx, cmd) {
                    return;
                }
            }
        }
    })
}

/// Keeps only the newest season load from a burst of commands; exports and refreshes
/// are kept in order.
pub fn coalesce(commands: Vec<ProviderCommand>) -> Vec<ProviderCommand> {
    let last_load = commands
        .iter()
        .rposition(|cmd| matches!(cmd, ProviderCommand::LoadSeason(_)));
    commands
        .into_iter()
        .enumerate()
        .filter(|(idx, cmd)| !matches!(cmd, ProviderCommand::LoadSeason(_)) || Some(*idx) == last_load)
        .map(|(_, cmd)| cmd)
        .collect()
}

/// Handles one command. Returns `false` once the UI side has hung up.
pub fn handle_command<S: PageSource>(
    pipeline: &SeasonPipeline<S>,
    tx: &Sender<Delta>,
    cmd: ProviderCommand,
) -> bool {
    match cmd {
        ProviderCommand::LoadSeason(season) => load_season(pipeline, tx, season),
        ProviderCommand::RefreshSeason(season) => {
            pipeline.invalidate(season);
            if tx
                .send(Delta::Log(format!("[INFO] Refreshing season {season}")))
                .is_err()
            {
                return false;
            }
            load_season(pipeline, tx, season)
        }
        ProviderCommand::Export { season, path } => {
            let delta = match pipeline.load(season) {
                Ok(snapshot) => {
                    match export_leaderboard(&snapshot, LEADERBOARD_SIZE, Path::new(&path)) {
                        Ok(report) => Delta::ExportFinished {
                            path,
                            players: report.players,
                            leaders: report.leaders,
                        },
                        Err(err) => {
                            tracing::warn!(error = %err, "export failed");
                            Delta::Log(format!("[WARN] Export error: {err:#}"))
                        }
                    }
                }
                Err(err) => Delta::Log(format!("[WARN] Export skipped: {err}")),
            };
            tx.send(delta).is_ok()
        }
    }
}

fn load_season<S: PageSource>(
    pipeline: &SeasonPipeline<S>,
    tx: &Sender<Delta>,
    season: SeasonId,
) -> bool {
    if !pipeline.is_cached(season) && tx.send(Delta::SeasonLoading(season)).is_err() {
        return false;
    }
    let delta = match pipeline.load(season) {
        Ok(snapshot) => Delta::SetSnapshot(snapshot),
        Err(err) => Delta::SeasonUnavailable {
            season,
            message: err.to_string(),
        },
    };
    tx.send(delta).is_ok()
}

#[cfg(test)]
mod tests {
    use super::coalesce;
    use crate::season::SeasonId;
    use crate::state::ProviderCommand;

    #[test]
    fn coalesce_keeps_latest_load_and_other_commands() {
        let export = ProviderCommand::Export {
            season: SeasonId(2024),
            path: "out.xlsx".to_string(),
        };
        let batch = vec![
            ProviderCommand::LoadSeason(SeasonId(2024)),
            export.clone(),
            ProviderCommand::LoadSeason(SeasonId(2023)),
            ProviderCommand::LoadSeason(SeasonId(2022)),
        ];
        assert_eq!(
            coalesce(batch),
            vec![export, ProviderCommand::LoadSeason(SeasonId(2022))]
        );
    }
}
