//! Full pipeline: identity, registration, proof, gate decision.

use secrecy::SecretSlice;
use sigil_core::scope::Scope;
use sigil_gate::{Gate, GateConfig, GateError};
use sigil_proofs::TranscriptBackend;
use sigil_sdk::commands::{
    build_signal, derive_identity, prove_membership, register_commitment, replay_signals,
    submit_signal, BuildOptions,
};

#[tokio::test]
async fn signal_flows_from_signature_to_accept() {
    let dir = tempfile::tempdir().expect("tempdir creation failed");
    let snapshot = dir.path().join("group.tree");

    // Three members join; ours is leaf 1.
    let ours = derive_identity(&SecretSlice::from(b"our wallet signature".to_vec()))
        .expect("derive failed");
    let other_a = derive_identity(&SecretSlice::from(b"alice".to_vec())).expect("derive failed");
    let other_b = derive_identity(&SecretSlice::from(b"carol".to_vec())).expect("derive failed");
    register_commitment(&snapshot, 4, other_a.commitment())
        .await
        .expect("register failed");
    let (index, _) = register_commitment(&snapshot, 4, ours.commitment())
        .await
        .expect("register failed");
    let (_, root) = register_commitment(&snapshot, 4, other_b.commitment())
        .await
        .expect("register failed");
    assert_eq!(index, 1);

    let membership = prove_membership(&snapshot, index).await.expect("prove failed");
    assert_eq!(membership.root, root);

    let scope = Scope::new(b"epoch-1");
    let signal = build_signal(
        ours.clone(),
        membership,
        scope,
        b"hello".to_vec(),
        TranscriptBackend,
        BuildOptions::default(),
    )
    .await
    .expect("build failed");

    let gate = Gate::open(&GateConfig::new(dir.path().join("gate")), TranscriptBackend)
        .expect("gate open failed");
    gate.track_root(root).expect("track failed");

    let accepted = submit_signal(&gate, &signal, scope).expect("submit failed");
    assert_eq!(accepted.seq, 0);
    assert_eq!(accepted.signal_digest, signal.public.signal_digest);

    // Same member, same scope: the nullifier has been spent.
    let retry = prove_membership(&snapshot, index).await.expect("prove failed");
    let second = build_signal(
        ours,
        retry,
        scope,
        b"a different message".to_vec(),
        TranscriptBackend,
        BuildOptions::default(),
    )
    .await
    .expect("build failed");
    let err = submit_signal(&gate, &second, scope).expect_err("duplicate must be rejected");
    assert!(matches!(err, GateError::DuplicateSignal));

    let log = replay_signals(&gate, 0).expect("replay failed");
    assert_eq!(log.len(), 1);
    assert_eq!(
        log.first().map(|s| s.nullifier_hash),
        Some(signal.public.nullifier_hash)
    );
}
