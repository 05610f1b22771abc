//! Optional embedded PostgreSQL smoke test.
//! Run with `RUN_PG_EMBEDDED=1 cargo test -- --ignored`.

use pg_embedded_setup_unpriv::TestCluster;

#[test]
#[ignore = "requires embedded Postgres binaries; opt-in via RUN_PG_EMBEDDED=1"]
fn pg_embedded_cluster_starts() {
    if std::env::var("RUN_PG_EMBEDDED").as_deref() != Ok("1") {
        eprintln!("SKIP-TEST-CLUSTER: set RUN_PG_EMBEDDED=1 to run");
        return;
    }

    let test_cluster = TestCluster::new().expect("embedded Postgres should start");
    let url = test_cluster.connection().database_url("suvidha");
    assert!(
        url.starts_with("postgresql://"),
        "database URL should start with postgresql://"
    );
}
