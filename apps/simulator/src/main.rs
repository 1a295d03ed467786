use std::{
    io::{self, Write as _},
    sync::Arc,
};

use anyhow::Result;
use clap::Parser;
use shared::domain::DeviceKind;
use sync_channel::LoopbackHub;
use tracker::{crossed_labels, FillAnimation, HydrationSession, Label, FRAME_STEP};

mod config;

use config::load_settings;

const GAUGE_WIDTH: usize = 20;

/// Runs a phone session and a wearable session against an in-process sync
/// channel and simulates button presses.
#[derive(Parser, Debug)]
struct Args {
    /// Number of button presses to simulate.
    #[arg(long, default_value_t = 10)]
    presses: u32,
    /// Alternate presses between phone and wearable instead of pressing
    /// only on the phone.
    #[arg(long)]
    alternate: bool,
    /// Skip the frame-by-frame water animation.
    #[arg(long)]
    no_animation: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter("warn").init();
    let args = Args::parse();
    let settings = load_settings();
    let plan = settings.plan();

    let hub = LoopbackHub::new();
    let phone = HydrationSession::start(DeviceKind::Phone, Arc::new(hub.attach()), plan);
    let wear = HydrationSession::start(DeviceKind::Wearable, Arc::new(hub.attach()), plan);
    let mut phone_rx = phone.subscribe();
    let mut wear_rx = wear.subscribe();

    println!(
        "Goal {} ml, +{} ml per press, {} presses",
        phone.plan().goal_ml,
        phone.plan().step_ml,
        args.presses
    );

    for press in 0..args.presses {
        let actor = if args.alternate && press % 2 == 1 {
            &wear
        } else {
            &phone
        };
        let before = actor.displayed().percentage;
        actor.press().await?;
        phone_rx.changed().await?;
        wear_rx.changed().await?;

        let state = *phone_rx.borrow();
        let animation = FillAnimation::between(before, state.percentage);
        if args.no_animation {
            print!("[{}]", gauge(animation.target()));
        } else {
            for level in animation.frames() {
                print!("\r[{}]", gauge(level));
                io::stdout().flush()?;
                tokio::time::sleep(FRAME_STEP).await;
            }
        }
        println!(
            " {:8} pressed | drunk {:>4} ml | remaining {:>4} ml",
            actor.kind().label(),
            state.drunk_ml,
            state.remain_ml
        );
        for label in crossed_labels(before, state.percentage) {
            let name = match label {
                Label::Drunk => "drunk",
                Label::Remain => "remaining",
            };
            println!("          {name} label switches color");
        }
    }

    let phone_final = phone.displayed();
    let wear_final = wear.displayed();
    println!(
        "Final: phone shows {} ml, wearable shows {} ml ({})",
        phone_final.drunk_ml,
        wear_final.drunk_ml,
        if phone_final == wear_final {
            "in sync"
        } else {
            "OUT OF SYNC"
        }
    );

    Ok(())
}

fn gauge(level: f32) -> String {
    let filled = ((level * GAUGE_WIDTH as f32).round() as usize).min(GAUGE_WIDTH);
    format!(
        "{}{} {:>3.0}%",
        "#".repeat(filled),
        "-".repeat(GAUGE_WIDTH - filled),
        level * 100.0
    )
}
