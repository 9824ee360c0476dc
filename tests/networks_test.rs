//! Integration tests for networks, tokens, and permission grants.

mod common;

use syndica_store::models::network::{NewNetwork, UpdateNetwork};
use syndica_store::models::network_member::NewNetworkMember;
use syndica_store::models::network_token::NewNetworkToken;
use syndica_store::store::NetworkFilter;
use syndica_store::{permissions, Page};

#[tokio::test]
async fn create_and_list_for_owner() {
    let Some(store) = common::test_store().await else {
        return;
    };
    let owner = common::create_test_user(&store, "net_owner").await;

    let network = store
        .networks()
        .create(NewNetwork {
            owner_id: owner.id,
            network_type: "mastodon",
            network_name: "fediverse main",
            note: Some("primary account"),
        })
        .await
        .expect("create network");
    assert_eq!(network.owner_id, owner.id);
    assert_eq!(network.note.as_deref(), Some("primary account"));

    let owned = store
        .networks()
        .list_for_owner(owner.id)
        .await
        .expect("list_for_owner");
    assert_eq!(owned.len(), 1);
    assert_eq!(owned[0].id, network.id);

    let renamed = store
        .networks()
        .update(
            network.id,
            UpdateNetwork {
                network_name: Some("fediverse backup".to_string()),
                ..Default::default()
            },
        )
        .await
        .expect("update");
    assert_eq!(renamed.network_name, "fediverse backup");

    common::cleanup_user(&store, owner.id).await;
}

#[tokio::test]
async fn filter_by_owner_and_type() {
    let Some(store) = common::test_store().await else {
        return;
    };
    let owner = common::create_test_user(&store, "net_filter").await;

    store
        .networks()
        .create_many(vec![
            NewNetwork {
                owner_id: owner.id,
                network_type: "mastodon",
                network_name: "a",
                note: None,
            },
            NewNetwork {
                owner_id: owner.id,
                network_type: "bluesky",
                network_name: "b",
                note: None,
            },
        ])
        .await
        .expect("create_many");

    let filter = NetworkFilter {
        owner_id: Some(owner.id),
        network_type: Some("bluesky".to_string()),
    };
    let hits = store
        .networks()
        .list(&filter, Page::default())
        .await
        .expect("list");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].network_type, "bluesky");

    let count = store.networks().count(&filter).await.expect("count");
    assert_eq!(count, 1);

    let all = NetworkFilter {
        owner_id: Some(owner.id),
        network_type: None,
    };
    assert_eq!(store.networks().count(&all).await.expect("count"), 2);

    common::cleanup_user(&store, owner.id).await;
}

#[tokio::test]
async fn unknown_owner_is_a_foreign_key_violation() {
    let Some(store) = common::test_store().await else {
        return;
    };

    let err = store
        .networks()
        .create(NewNetwork {
            owner_id: -1,
            network_type: "mastodon",
            network_name: "orphan",
            note: None,
        })
        .await
        .unwrap_err();
    assert!(
        matches!(err, syndica_store::StoreError::ForeignKeyViolation { .. }),
        "got: {err:?}"
    );
}

#[tokio::test]
async fn token_upsert_rotates_in_place() {
    let Some(store) = common::test_store().await else {
        return;
    };
    let owner = common::create_test_user(&store, "tok_owner").await;
    let network = store
        .networks()
        .create(NewNetwork {
            owner_id: owner.id,
            network_type: "mastodon",
            network_name: "tokens",
            note: None,
        })
        .await
        .expect("create network");

    store
        .network_tokens()
        .create(NewNetworkToken {
            network_id: network.id,
            token_name: "access",
            token: "secret-1",
        })
        .await
        .expect("create token");

    let rotated = store
        .network_tokens()
        .upsert(NewNetworkToken {
            network_id: network.id,
            token_name: "access",
            token: "secret-2",
        })
        .await
        .expect("rotate token");
    assert_eq!(rotated.token, "secret-2");

    let fetched = store
        .network_tokens()
        .get(network.id, "access")
        .await
        .expect("get token");
    assert_eq!(fetched.token, "secret-2");

    let count = store
        .network_tokens()
        .count_for_network(network.id)
        .await
        .expect("count");
    assert_eq!(count, 1);

    common::cleanup_user(&store, owner.id).await;
}

#[tokio::test]
async fn grant_and_regrant_permission() {
    let Some(store) = common::test_store().await else {
        return;
    };
    let owner = common::create_test_user(&store, "grant_owner").await;
    let grantee = common::create_test_user(&store, "grant_grantee").await;
    let network = store
        .networks()
        .create(NewNetwork {
            owner_id: owner.id,
            network_type: "mastodon",
            network_name: "shared",
            note: None,
        })
        .await
        .expect("create network");

    let grant = store
        .network_members()
        .upsert(NewNetworkMember {
            networks_id: network.id,
            granter_id: owner.id,
            grantee_id: grantee.id,
            permission: permissions::DEFAULT_MEMBER_PERMISSIONS,
        })
        .await
        .expect("grant");
    assert!(permissions::has(grant.permission, permissions::VIEW_NETWORK));
    assert!(!permissions::has(grant.permission, permissions::MANAGE_TOKENS));

    let regrant = store
        .network_members()
        .upsert(NewNetworkMember {
            networks_id: network.id,
            granter_id: owner.id,
            grantee_id: grantee.id,
            permission: permissions::DEFAULT_MEMBER_PERMISSIONS | permissions::MANAGE_TOKENS,
        })
        .await
        .expect("regrant");
    assert!(permissions::has(regrant.permission, permissions::MANAGE_TOKENS));

    let count = store
        .network_members()
        .count_for_network(network.id)
        .await
        .expect("count");
    assert_eq!(count, 1);

    let granted = store
        .network_members()
        .networks_for_user(grantee.id)
        .await
        .expect("networks_for_user");
    assert_eq!(granted.len(), 1);
    assert_eq!(granted[0].id, network.id);

    common::cleanup_user(&store, owner.id).await;
    common::cleanup_user(&store, grantee.id).await;
}

#[tokio::test]
async fn deleting_a_network_cascades() {
    let Some(store) = common::test_store().await else {
        return;
    };
    let owner = common::create_test_user(&store, "cascade_owner").await;
    let grantee = common::create_test_user(&store, "cascade_grantee").await;
    let network = store
        .networks()
        .create(NewNetwork {
            owner_id: owner.id,
            network_type: "bluesky",
            network_name: "doomed",
            note: None,
        })
        .await
        .expect("create network");

    store
        .network_tokens()
        .create(NewNetworkToken {
            network_id: network.id,
            token_name: "access",
            token: "secret",
        })
        .await
        .expect("create token");
    store
        .network_members()
        .create(NewNetworkMember {
            networks_id: network.id,
            granter_id: owner.id,
            grantee_id: grantee.id,
            permission: permissions::VIEW_NETWORK,
        })
        .await
        .expect("create grant");

    store.networks().delete(network.id).await.expect("delete");

    assert!(store
        .network_tokens()
        .find(network.id, "access")
        .await
        .expect("find token")
        .is_none());
    assert_eq!(
        store
            .network_members()
            .count_for_network(network.id)
            .await
            .expect("count grants"),
        0
    );

    common::cleanup_user(&store, owner.id).await;
    common::cleanup_user(&store, grantee.id).await;
}
