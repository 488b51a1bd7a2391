//! Restart against a real LMDB database: the tree is rebuilt from stored
//! leaves and polling resumes at the persisted cursor.

use std::sync::Arc;

use shadow_crypto::HashEngine;
use shadow_indexer::{IndexerConfig, IndexerContext, IndexerMetrics, Poller};
use shadow_nullables::{execute_block, public_transition, NullChain};
use shadow_store_lmdb::LmdbEnvironment;
use shadow_types::AccountId;

fn open(dir: &tempfile::TempDir) -> Arc<LmdbEnvironment> {
    Arc::new(LmdbEnvironment::open_and_migrate(dir.path()).expect("open lmdb"))
}

fn poller(
    chain: &NullChain,
    env: Arc<LmdbEnvironment>,
    config: &IndexerConfig,
) -> Poller<NullChain, LmdbEnvironment> {
    let ctx = IndexerContext::load(
        env,
        Arc::new(HashEngine::new().unwrap()),
        config.tree_depth,
        Arc::new(IndexerMetrics::new().unwrap()),
    )
    .unwrap();
    Poller::new(chain.clone(), ctx, config).unwrap()
}

#[tokio::test]
async fn restart_rebuilds_same_root_and_resumes() {
    let dir = tempfile::tempdir().unwrap();
    let config = IndexerConfig {
        tree_depth: 8,
        start_height: Some(1),
        ..IndexerConfig::default()
    };
    let program = config.program_id.clone();

    let chain = NullChain::new(2);
    chain.put_block(execute_block(
        1,
        vec![
            public_transition("au1", &program, "deposit", &["aleo1alice", "100u64", "1field", "enc-a"]),
            public_transition("au2", &program, "deposit", &["aleo1bob", "50u64", "2field"]),
        ],
    ));
    chain.put_block(execute_block(
        2,
        vec![public_transition("au3", &program, "cast_vote", &["aleo1alice", "80u64", "3field"])],
    ));

    let root_before = {
        let mut p = poller(&chain, open(&dir), &config);
        p.poll_once().await.unwrap();
        p.context().tree().root()
    };

    chain.set_head(3);
    chain.put_block(execute_block(
        3,
        vec![public_transition("au4", &program, "deposit", &["aleo1carol", "5u64", "4field"])],
    ));

    let mut p = poller(&chain, open(&dir), &config);
    assert_eq!(p.cursor(), Some(3));
    assert_eq!(p.context().tree().root(), root_before);

    let alice = p
        .context()
        .tree()
        .leaf(&AccountId::new("aleo1alice").unwrap())
        .cloned()
        .unwrap();
    assert_eq!(alice.index, 0);
    assert_eq!(alice.balance, 80);
    assert_eq!(alice.encrypted_salt, "enc-a");

    p.poll_once().await.unwrap();
    let carol = p
        .context()
        .tree()
        .leaf(&AccountId::new("aleo1carol").unwrap())
        .cloned()
        .unwrap();
    assert_eq!(carol.index, 2);
    assert_eq!(chain.fetched(), vec![1, 2, 3]);
}
