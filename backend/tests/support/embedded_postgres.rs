//! Embedded PostgreSQL for the repository integration tests.
//!
//! One cluster is bootstrapped per test binary through
//! `pg-embed-setup-unpriv`. Every test then receives its own temporary
//! database with the application migrations applied, so tests never observe
//! each other's rows.
//!
//! The bootstrap writes under the cargo target directory rather than
//! `/var/tmp` unless `PG_RUNTIME_DIR` and `PG_DATA_DIR` are both set, and pins
//! `PG_PASSWORD` so a reused data directory keeps accepting the password it
//! was initialised with.

use std::path::PathBuf;
use std::sync::{Mutex, OnceLock, PoisonError};
use std::time::Duration;

use env_lock::lock_env;
use pg_embedded_setup_unpriv::{ClusterHandle, TemporaryDatabase};
use social_events::outbound::persistence::run_pending_migrations;

static BOOTSTRAP_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

const BOOTSTRAP_RETRIES: usize = 3;
const BOOTSTRAP_RETRY_DELAY: Duration = Duration::from_millis(500);
const TEST_PASSWORD: &str = "social_events_embedded_test";

/// A migrated database that is dropped together with this value.
pub struct TestDatabase {
    url: String,
    _database: TemporaryDatabase,
}

impl TestDatabase {
    /// Connection URL of the temporary database.
    pub fn url(&self) -> &str {
        &self.url
    }
}

fn pg_embed_dir() -> PathBuf {
    let target = std::env::var_os("CARGO_TARGET_DIR").map_or_else(
        || PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("..").join("target"),
        PathBuf::from,
    );
    target
        .join("pg-embed")
        .join(format!("bootstrap-{}", std::process::id()))
}

/// Environment applied while the cluster bootstraps.
fn bootstrap_env() -> Result<Vec<(&'static str, Option<String>)>, String> {
    let mut overrides = Vec::new();
    if std::env::var_os("PG_PASSWORD").is_none() {
        overrides.push(("PG_PASSWORD", Some(TEST_PASSWORD.to_owned())));
    }
    if std::env::var_os("PG_RUNTIME_DIR").is_none() || std::env::var_os("PG_DATA_DIR").is_none() {
        let base = pg_embed_dir();
        let runtime_dir = base.join("install");
        let data_dir = base.join("data");
        for dir in [&runtime_dir, &data_dir] {
            std::fs::create_dir_all(dir)
                .map_err(|err| format!("create {}: {err}", dir.display()))?;
        }
        overrides.push((
            "PG_RUNTIME_DIR",
            Some(runtime_dir.to_string_lossy().into_owned()),
        ));
        overrides.push(("PG_DATA_DIR", Some(data_dir.to_string_lossy().into_owned())));
    }
    Ok(overrides)
}

/// The cluster shared by every test in this binary, started on first use.
fn shared_cluster() -> Result<&'static ClusterHandle, String> {
    let _bootstrap = BOOTSTRAP_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
    let _env = lock_env(bootstrap_env()?);

    let mut attempt = 1;
    loop {
        match pg_embedded_setup_unpriv::test_support::shared_cluster_handle() {
            Ok(handle) => return Ok(handle),
            Err(err) if attempt < BOOTSTRAP_RETRIES => {
                eprintln!("pg-embed: bootstrap attempt {attempt} failed, retrying: {err:?}");
                std::thread::sleep(BOOTSTRAP_RETRY_DELAY);
                attempt += 1;
            }
            Err(err) => return Err(format!("bootstrap embedded cluster: {err:?}")),
        }
    }
}

/// Provision a fresh database on the shared cluster and migrate it.
pub async fn migrated_database() -> Result<TestDatabase, String> {
    let database = shared_cluster()?
        .create_temporary_database()
        .map_err(|err| format!("create temporary database: {err:?}"))?;
    let url = database.url().to_string();
    run_pending_migrations(&url)
        .await
        .map_err(|err| format!("migrate {url}: {err}"))?;
    Ok(TestDatabase {
        url,
        _database: database,
    })
}
