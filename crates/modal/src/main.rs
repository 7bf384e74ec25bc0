//! Drive the quick-buy modal against a live storefront from the terminal.
//!
//! ```text
//! STOREFRONT_URL=https://shop.example.com \
//! BONUS_ENABLED=true BONUS_HANDLE=soft-winter-jacket \
//!     quickbuy-modal classic-tee Color=Black Size=Medium --qty 2 --add
//! ```

use anyhow::{Context, Result, anyhow, bail};

use quickbuy_core::ProductHandle;
use quickbuy_modal::{
    EventBus, InMemoryEventBus, ModalConfig, ModalController, UiEffect, UiEvent,
};
use quickbuy_storefront::{HttpStorefront, StorefrontApi};

#[derive(Debug)]
struct CliArgs {
    handle: ProductHandle,
    choices: Vec<(String, String)>,
    quantity: Option<String>,
    add: bool,
}

impl CliArgs {
    fn parse(mut args: impl Iterator<Item = String>) -> Result<Self> {
        let handle = args
            .next()
            .context("usage: quickbuy-modal <handle> [Option=Value ...] [--qty N] [--add]")?
            .parse::<ProductHandle>()?;

        let mut parsed = Self {
            handle,
            choices: Vec::new(),
            quantity: None,
            add: false,
        };
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--add" => parsed.add = true,
                "--qty" => parsed.quantity = Some(args.next().context("--qty needs a value")?),
                other => {
                    let (name, value) = other
                        .split_once('=')
                        .with_context(|| format!("expected Option=Value, got {other:?}"))?;
                    parsed.choices.push((name.to_string(), value.to_string()));
                }
            }
        }
        Ok(parsed)
    }
}

type Bus = InMemoryEventBus<UiEvent>;

fn publish(bus: &Bus, event: UiEvent) -> Result<()> {
    bus.publish(event).map_err(|e| anyhow!("event bus: {e:?}"))
}

/// Pump until no effects remain, performing alerts and delayed closes.
async fn settle<S: StorefrontApi>(controller: &mut ModalController<S>, bus: &Bus) -> Result<()> {
    loop {
        let effects = controller.pump().await;
        if effects.is_empty() {
            return Ok(());
        }
        for effect in effects {
            match effect {
                UiEffect::Alert(message) => eprintln!("alert: {message}"),
                UiEffect::ScheduleClose { after, generation } => {
                    tokio::time::sleep(after).await;
                    publish(bus, UiEvent::CloseTimerElapsed { generation })?;
                }
            }
        }
    }
}

fn print_view<S: StorefrontApi>(controller: &ModalController<S>) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&controller.view())?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    quickbuy_observability::init_with_default("warn");

    let args = CliArgs::parse(std::env::args().skip(1))?;
    let base_url = std::env::var("STOREFRONT_URL").context("STOREFRONT_URL not set")?;
    let config = ModalConfig::from_env();
    tracing::info!(%base_url, bonus = ?config.bonus, "starting");

    let bus = Bus::new();
    let mut controller = ModalController::new(HttpStorefront::new(base_url), config);
    controller.attach(&bus);

    publish(&bus, UiEvent::OpenProduct { handle: args.handle.clone() })?;
    settle(&mut controller, &bus).await?;

    let axis_names: Vec<String> = match controller.state().loaded() {
        Some(loaded) => loaded.product().options.iter().map(|o| o.name.clone()).collect(),
        None => bail!("product {} could not be loaded", args.handle),
    };

    for (name, value) in &args.choices {
        let axis = axis_names
            .iter()
            .position(|n| n.eq_ignore_ascii_case(name))
            .with_context(|| format!("product has no option named {name:?} (has {axis_names:?})"))?;
        publish(&bus, UiEvent::OptionChanged { axis, value: value.clone() })?;
    }
    if let Some(quantity) = &args.quantity {
        publish(&bus, UiEvent::QuantityChanged(quantity.clone()))?;
    }
    settle(&mut controller, &bus).await?;
    print_view(&controller)?;

    if args.add {
        publish(&bus, UiEvent::AddClicked)?;
        // One pump only: the delayed close would clear the note we want to show.
        for effect in controller.pump().await {
            match effect {
                UiEffect::Alert(message) => bail!("add to cart failed: {message}"),
                UiEffect::ScheduleClose { .. } => {}
            }
        }
        print_view(&controller)?;
        if let Some(submission) = controller.last_submission() {
            println!("{}", serde_json::to_string_pretty(&submission.bonus)?);
        }
    }

    controller.detach();
    Ok(())
}
