//! Authorization engine benchmarks
//!
//! Measures a full `can_this` round trip (grant loads + scope scan) as the
//! number of roles and grants grows.

use canthis_authz::store::{
    InMemoryAppStore, InMemoryCatalog, InMemoryObjectStore, InMemoryRoleStore, InMemoryUserStore,
};
use canthis_authz::{
    AuthContext, Authorizer, AuthzStores, EngineConfig, ObjectTypeRegistry, Permission,
    PermissionGrant, Role, Target, User,
};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde_json::json;
use std::sync::Arc;
use tokio::runtime::Runtime;

fn create_permissions(count: usize) -> Vec<Permission> {
    (0..count)
        .map(|i| {
            Permission::new(
                format!("p-{}", i),
                format!("Permission {}", i),
                format!("action{}", i % 10),
                format!("type{}", i / 10),
            )
        })
        .collect()
}

fn build_authorizer(rt: &Runtime, role_count: usize, grants_per_role: usize) -> Authorizer {
    rt.block_on(async {
        let permissions = create_permissions(grants_per_role.max(1));

        let roles = Arc::new(InMemoryRoleStore::new());
        let mut user = User::new("bench-user");
        for r in 0..role_count {
            let mut role = Role::new(format!("role-{}", r), format!("Role {}", r));
            for permission in &permissions {
                role = role.with_grant(PermissionGrant::related(
                    permission.clone(),
                    ["owner_id"],
                    [format!("{}", r)],
                ));
            }
            roles.put(role).await;
            user = user.with_role(format!("role-{}", r));
        }
        user = user.with_grant(PermissionGrant::me(permissions[0].clone(), "owner_id"));

        let users = Arc::new(InMemoryUserStore::new());
        users.put(user).await;

        let objects = Arc::new(InMemoryObjectStore::new());
        objects.put("1", json!({"id": "1", "owner_id": "bench-user"})).await;

        let registry = ObjectTypeRegistry::builder()
            .register(permissions[0].object_type.clone(), objects)
            .build();

        let config = EngineConfig {
            enable_metrics: false, // Benchmark without metrics
            ..Default::default()
        };

        let authorizer = Authorizer::new(
            config,
            AuthzStores {
                catalog: Arc::new(InMemoryCatalog::with_permissions(permissions)),
                roles,
                users,
                apps: Arc::new(InMemoryAppStore::new()),
            },
            registry,
        );
        authorizer.init().await.unwrap();
        authorizer
    })
}

fn bench_can_this_me_scope(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();

    let mut group = c.benchmark_group("can_this_me_scope");

    for role_count in [1, 10, 50].iter() {
        group.bench_with_input(BenchmarkId::new("roles", role_count), role_count, |b, &count| {
            let authorizer = build_authorizer(&rt, count, 20);

            b.to_async(&rt).iter(|| async {
                let query = authorizer.can_this(AuthContext::user("bench-user")).unwrap();
                let result = query
                    .evaluate("action0", "type0", black_box(Target::id("1")), Some("me"))
                    .await
                    .unwrap();
                black_box(result);
            });
        });
    }

    group.finish();
}

fn bench_internal_bypass(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let authorizer = build_authorizer(&rt, 1, 100);

    c.bench_function("internal_bypass", |b| {
        b.to_async(&rt).iter(|| async {
            let query = authorizer.can_this(AuthContext::internal()).unwrap();
            let result = query
                .evaluate("action0", "type0", Target::None, None)
                .await
                .unwrap();
            black_box(result);
        });
    });
}

criterion_group!(benches, bench_can_this_me_scope, bench_internal_bypass);
criterion_main!(benches);
