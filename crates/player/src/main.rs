//! Trailhunt Player - terminal composition root.
//!
//! Usage: `trailhunt-player [resume-query]`
//!
//! Without a resume query the session comes from `TRAILHUNT_USER_ID` and
//! `TRAILHUNT_TRAIL_REF`. Commands are read from stdin one per line.

use std::sync::Arc;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use trailhunt_domain::{Position, Task};
use trailhunt_player::application::{
    ContinueResult, PlayerConfig, PositionReading, ProximityStatus, QueryParams, SettingsService,
    TrailGateway, TrailOrchestrator,
};
use trailhunt_player::infrastructure::{platform::create_platform, EventBus, HttpApiAdapter};
use trailhunt_player::outbound::TrailEvent;

const HELP: &str = "commands: continue | retry | ack | chat <text> | pos <lat> <lng> | deny | \
markers | where | debug on|off | query | quit";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Optional: a missing .env is not an error
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "trailhunt_player=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Trailhunt Player");

    let config = PlayerConfig::from_env();
    let settings = SettingsService::new(create_platform());

    // HTTP
    let api = Arc::new(HttpApiAdapter::new(&config.api_url));
    let gateway = TrailGateway::new(api, config.request_timeout_ms)
        .with_chat_path(config.chat_path.clone());

    let events = EventBus::new();
    events.subscribe(print_event).await;

    let orchestrator = TrailOrchestrator::new(Arc::new(gateway), events, config.proximity);
    orchestrator.set_debug(settings.debug_mode());

    let mut session = match std::env::args().nth(1) {
        Some(query) => {
            let params = QueryParams::parse(&query).context("Invalid resume query")?;
            if let Some(step) = orchestrator.resume(&params).await? {
                print_task(&step.task);
            }
            params.session()?
        }
        None => config
            .session()
            .context("Set TRAILHUNT_USER_ID and TRAILHUNT_TRAIL_REF or pass a resume query")?,
    };

    tracing::info!(
        api_url = %config.api_url,
        session = %session.session_key(),
        debug = orchestrator.debug(),
        "Session ready"
    );
    println!("{}", HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("Failed to read stdin")? {
        let line = line.trim();
        let (command, rest) = line.split_once(' ').unwrap_or((line, ""));

        match command {
            "" => {}
            "continue" | "c" => report(orchestrator.continue_trail(session.clone()).await),
            "retry" => report(orchestrator.retry(session.clone()).await),
            "ack" => match orchestrator.acknowledge_outcome().await {
                Ok(step) => print_task(&step.task),
                Err(e) => println!("! {}", e),
            },
            "chat" => match orchestrator.send_chat_message(&session, rest.trim()).await {
                Ok(reply) => {
                    for item in &reply.items {
                        println!("+ received {}", item.name);
                    }
                }
                Err(e) => println!("! chat failed: {}", e),
            },
            "pos" => match parse_position(rest) {
                Ok(position) => {
                    session = session.with_position(Some(position));
                    let update = orchestrator
                        .update_position(PositionReading::Fix(position))
                        .await;
                    print_status(update.status);
                }
                Err(e) => println!("! {}", e),
            },
            "deny" => {
                session = session.with_position(None);
                let update = orchestrator
                    .update_position(PositionReading::PermissionDenied)
                    .await;
                print_status(update.status);
            }
            "where" => match orchestrator.distance_to_target() {
                Ok(distance) => println!("target is {:.0}m away", distance),
                Err(e) => println!("! {}", e),
            },
            "markers" => match orchestrator.refresh_markers(&session).await {
                Ok(markers) => {
                    for marker in markers {
                        println!(
                            "* {} ({:.5}, {:.5}) {}",
                            marker.colour,
                            marker.lat,
                            marker.lng,
                            marker.title.unwrap_or_default()
                        );
                    }
                }
                Err(e) => println!("! markers failed: {}", e),
            },
            "debug" => {
                let enabled = rest.trim() == "on";
                settings.set_debug_mode(enabled);
                orchestrator.set_debug(enabled);
                println!("debug {}", if enabled { "on" } else { "off" });
            }
            "query" => match orchestrator.query_params(&session).to_query_string() {
                Ok(query) => println!("?{}", query),
                Err(e) => println!("! {}", e),
            },
            "quit" | "q" => break,
            _ => println!("{}", HELP),
        }
    }

    orchestrator.abandon().await;
    tracing::info!("Trailhunt Player stopped");
    Ok(())
}

fn report(result: Result<ContinueResult, trailhunt_player::TrailError>) {
    match result {
        Ok(ContinueResult::Dispatched(step)) => print_task(&step.task),
        Ok(ContinueResult::AwaitingAck(_)) => println!("(type `ack` to collect your reward)"),
        Ok(ContinueResult::Ignored) => println!("(busy)"),
        Ok(ContinueResult::Complete) | Ok(ContinueResult::Stale) => {}
        Err(e) if e.is_retryable() => println!("! {} (type `retry`)", e),
        Err(e) => println!("! {}", e),
    }
}

fn parse_position(args: &str) -> anyhow::Result<Position> {
    let mut parts = args.split_whitespace();
    let lat: f64 = parts
        .next()
        .context("usage: pos <lat> <lng>")?
        .parse()
        .context("lat must be a number")?;
    let lng: f64 = parts
        .next()
        .context("usage: pos <lat> <lng>")?
        .parse()
        .context("lng must be a number")?;
    Ok(Position::new(lat, lng)?)
}

fn print_task(task: &Task) {
    println!("[{}] {}", task.task_type(), task.content().unwrap_or(""));
    match task {
        Task::QuestionMulti(q) | Task::QuestionSingle(q) => {
            for (i, choice) in q.answer_choices.iter().enumerate() {
                println!("  {}. {}", i + 1, choice);
            }
        }
        Task::Marker(m) => println!(
            "  head to ({:.5}, {:.5}) {}",
            m.lat,
            m.lng,
            m.title.as_deref().unwrap_or("")
        ),
        Task::Chat(c) => println!(
            "  {} is listening (use `chat <text>`)",
            c.character_name.as_deref().unwrap_or("someone")
        ),
        _ => {}
    }
}

fn print_status(status: ProximityStatus) {
    match status {
        ProximityStatus::NoTarget => println!("(no target)"),
        ProximityStatus::NoPosition(reason) => println!("position unknown ({:?})", reason),
        ProximityStatus::Outside { distance_m } => println!("{:.0}m to go", distance_m),
        ProximityStatus::Inside { distance_m } => println!("within {:.0}m of the target", distance_m),
    }
}

fn print_event(event: TrailEvent) {
    match event {
        TrailEvent::RewardPresented { outcome } => {
            println!("** {} - {} ({:?})", outcome.title, outcome.subtitle, outcome.sentiment);
            for item in outcome.items {
                println!("+ received {}", item.name);
            }
        }
        TrailEvent::TrailCompleted => println!("** Trail complete!"),
        TrailEvent::TargetFound { distance_m, .. } => {
            println!("** Found it! ({:.0}m)", distance_m)
        }
        TrailEvent::ChatReplied { message, energy } => match energy {
            Some(energy) => println!("> {} [energy {}]", message, energy),
            None => println!("> {}", message),
        },
        TrailEvent::TargetMarkerChanged {
            added: Some(marker),
            ..
        } => println!(
            "** New target at ({:.5}, {:.5})",
            marker.position.lat, marker.position.lng
        ),
        TrailEvent::StepFailed { .. }
        | TrailEvent::TargetMarkerChanged { .. }
        | TrailEvent::PhaseChanged { .. }
        | TrailEvent::TaskDispatched { .. } => tracing::trace!(?event, "Trail event"),
    }
}
