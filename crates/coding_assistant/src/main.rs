use std::io;
use std::process::exit;
use std::sync::Arc;

use chat_api::{ChatApiConfig, HttpChatClient};
use coding_assistant::app::App;
use coding_assistant::cli::{parse_resume_selection, ResumeSelection};
use coding_assistant::engine::{system_prompt_from_env, ConversationEngine};
use coding_assistant::runtime::TurnRunner;
use coding_assistant::tools::ToolRegistry;
use coding_assistant::ui::Ui;
use ledger_tui::{DebugLog, EnvConfig, ProcessTerminal, Theme};
use session_store::{find_latest_run_id, generate_run_id, load_session, session_root, SessionData};

fn main() -> io::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let cwd = std::env::current_dir()?;
    let cwd_display = cwd.display().to_string();

    let env_config = EnvConfig::from_env();
    let debug_log = Arc::new(DebugLog::from_env(&env_config));
    let theme = if env_config.light_theme {
        Theme::light()
    } else {
        Theme::dark()
    };

    let api_config = match ChatApiConfig::from_env() {
        Ok(config) => config,
        Err(error) => {
            eprintln!("{error}");
            exit(1);
        }
    };

    let session_root = session_root(&cwd);
    let session = match parse_resume_selection(&args) {
        Some(selection) => {
            let run_id = match selection {
                ResumeSelection::Id(run_id) => Some(run_id),
                ResumeSelection::Latest => find_latest_run_id(&session_root),
            };

            let Some(run_id) = run_id else {
                eprintln!("No saved sessions found to resume.");
                exit(1);
            };

            match load_session(&run_id, &session_root) {
                Some(loaded) => loaded,
                None => {
                    eprintln!("Failed to load session for run_id {run_id}.");
                    exit(1);
                }
            }
        }
        None => SessionData::new(
            generate_run_id(),
            cwd_display.clone(),
            api_config.model.clone(),
        ),
    };

    let transport = match HttpChatClient::new(api_config) {
        Ok(client) => client,
        Err(error) => {
            eprintln!("{error}");
            exit(1);
        }
    };

    let engine = Arc::new(ConversationEngine::new(
        Arc::new(transport),
        ToolRegistry::builtin(&cwd),
        system_prompt_from_env(&cwd_display),
    ));
    engine.restore_log(session.log.clone());

    debug_log.log(&format!("session {} starting", session.run_id));
    let runner = TurnRunner::new(Arc::clone(&engine), debug_log);
    let terminal = ProcessTerminal::new()?;
    let app = App::new(&cwd);

    Ui::new(terminal, app, runner, theme, session, session_root).run()
}
