#[cfg(not(target_arch = "wasm32"))]
use {
    account_explorer::{
        Cli, ExplorerEngine, FiatCurrency, HttpExplorerApi, TaskSpawner,
        data::FileStateStore,
        engine::{BalanceBuckets, FiatBuckets, OfferedAction, SessionStatus, minor_to_native},
        utils::TimeUtils,
    },
    anyhow::{Context, Result, bail},
    clap::Parser,
    std::{panic, sync::Arc, time::Duration},
    tabled::{Table, Tabled, settings::Style},
};

// The browser entry point lives in the library (`account_explorer::web`).
#[cfg(target_arch = "wasm32")]
fn main() {}

#[cfg(not(target_arch = "wasm32"))]
#[derive(Tabled)]
struct BalanceRow {
    #[tabled(rename = "Balance")]
    bucket: &'static str,
    #[tabled(rename = "Native")]
    native: String,
    #[tabled(rename = "Fiat")]
    fiat: String,
}

#[cfg(not(target_arch = "wasm32"))]
#[derive(Tabled)]
struct ActionRow {
    #[tabled(rename = "Action")]
    action: String,
    #[tabled(rename = "Available")]
    enabled: bool,
    #[tabled(rename = "Transaction")]
    transaction: String,
}

#[cfg(not(target_arch = "wasm32"))]
fn balance_rows(
    buckets: &BalanceBuckets,
    fiat: Option<FiatBuckets>,
    currency: FiatCurrency,
) -> Vec<BalanceRow> {
    // Absent rate renders as a dash, never as zero.
    let fmt_fiat = |pick: fn(&FiatBuckets) -> f64| match &fiat {
        Some(f) => format!("{:.2} {}", pick(f), currency.code()),
        None => "-".to_string(),
    };
    vec![
        BalanceRow {
            bucket: "Total",
            native: format!("{:.6}", minor_to_native(buckets.total)),
            fiat: fmt_fiat(|f| f.total),
        },
        BalanceRow {
            bucket: "Reserved",
            native: format!("{:.6}", minor_to_native(buckets.reserved)),
            fiat: fmt_fiat(|f| f.reserved),
        },
        BalanceRow {
            bucket: "Available",
            native: format!("{:.6}", minor_to_native(buckets.available)),
            fiat: fmt_fiat(|f| f.available),
        },
    ]
}

#[cfg(not(target_arch = "wasm32"))]
fn action_rows(actions: &[OfferedAction]) -> Vec<ActionRow> {
    actions
        .iter()
        .map(|a| ActionRow {
            action: a.kind.to_string(),
            enabled: a.enabled,
            transaction: a
                .request
                .operation
                .as_ref()
                .map(|op| op.tx_json()["TransactionType"].as_str().unwrap_or("").to_string())
                .unwrap_or_else(|| "SignIn".to_string()),
        })
        .collect()
}

#[cfg(not(target_arch = "wasm32"))]
fn print_view(engine: &ExplorerEngine) -> Result<()> {
    let view = engine.view();
    let Some(snapshot) = view.snapshot() else {
        bail!("No account data received");
    };

    println!("{} ({})", snapshot.display_name(), snapshot.address);
    match view.selection().instant() {
        Some(at) => println!("As of {}", TimeUtils::to_iso_millis(&at)),
        None => println!("Live"),
    }
    if let Some(identity) = engine.active_identity() {
        println!("Signed in as {} via {}", identity.address, identity.wallet);
    }

    match view.balances() {
        Some(buckets) => {
            let mut table = Table::new(balance_rows(
                &buckets,
                view.fiat_balances(),
                engine.currency(),
            ));
            table.with(Style::rounded());
            println!("{}", table);
        }
        None => println!("Account not activated or network parameters unavailable"),
    }
    if let Some(e) = view.rate_error() {
        println!("Fiat rate unavailable: {}", e.message_key());
    }

    let actions = engine.offered_actions();
    if !actions.is_empty() {
        let mut table = Table::new(action_rows(&actions));
        table.with(Style::rounded());
        println!("{}", table);
    }
    Ok(())
}

#[cfg(not(target_arch = "wasm32"))]
async fn run(args: Cli) -> Result<()> {
    let settings = args.settings();
    let entry = args.entry_context()?;
    let wait = Duration::from_secs(args.wait_secs);

    let api = Arc::new(HttpExplorerApi::new(
        &settings.api_base,
        settings.api_token.as_deref(),
    )?);
    let store = Box::new(FileStateStore::new(&args.state_path));

    let mut engine = ExplorerEngine::new(
        api.clone(),
        api,
        store,
        TaskSpawner::current()?,
        settings,
        entry,
    );
    engine.set_currency(args.currency);
    engine.start();

    if !engine.pump_until(|e| e.is_settled(), wait).await {
        bail!("Timed out waiting for the explorer API");
    }
    if let Some(e) = engine.view().error() {
        bail!("{} [{}]", e, e.message_key());
    }

    if let Some(raw) = &args.at {
        let at = TimeUtils::parse_instant(raw).with_context(|| {
            format!("--at expects RFC 3339 or epoch milliseconds, got '{}'", raw)
        })?;
        if let Err(e) = engine.select_instant(at) {
            bail!("{} [{}]", e, e.message_key());
        }
        engine.confirm_instant();
        if !engine.pump_until(|e| e.is_settled(), wait).await {
            bail!("Timed out waiting for the historical account state");
        }
        if let Some(e) = engine.view().error() {
            bail!("{} [{}]", e, e.message_key());
        }
    }

    if engine.is_signing() {
        log::info!("Waiting for the sign session to resolve");
        engine.pump_until(|e| !e.is_signing() && e.is_settled(), wait).await;
        match engine.last_sign_outcome() {
            Some(s) if s.status == SessionStatus::Resolved => {
                println!("Sign session {} resolved", s.correlation_id)
            }
            Some(s) => println!(
                "Sign session {} abandoned: {:?}",
                s.correlation_id, s.abandon_reason
            ),
            None => match engine.abandoned_open() {
                Some(open) => println!("Sign request abandoned: {:?}", open.reason),
                None => println!("Sign session still pending"),
            },
        }
    }

    print_view(&engine)
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<()> {
    panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::force_capture();
        log::error!("CRITICAL PANIC:\n{}\nStack Trace:\n{}", info, backtrace);
    }));

    let (global_level, my_code_level) = if cfg!(debug_assertions) {
        (log::LevelFilter::Warn, log::LevelFilter::Info)
    } else {
        (log::LevelFilter::Error, log::LevelFilter::Error)
    };

    let mut builder = env_logger::Builder::new();

    builder
        .filter(None, global_level)
        .filter(Some("account_explorer"), my_code_level)
        .init();

    let args = Cli::parse();
    let runtime = tokio::runtime::Runtime::new().context("Failed to start tokio runtime")?;
    runtime.block_on(run(args))
}
