//! Performance benchmarks for the WorkFlowX engine.
//!
//! This benchmark suite covers the hot paths:
//! - Bulk import validation of 100 and 1000 rows
//! - Attendance aggregation over 10,000 records
//! - Attendance report served over HTTP
//!
//! Run with: `cargo bench`
//! HTML reports are generated in `target/criterion/`

use chrono::{Duration, NaiveDate};
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use workflowx::api::{AppState, create_router};
use workflowx::auth::hash_password;
use workflowx::calculation::{attendance_percentage, summarize_attendance};
use workflowx::config::{ConfigLoader, ValidationConfig};
use workflowx::import::{BulkImportValidator, FieldRules, ImportSnapshot};
use workflowx::models::{
    AttendanceRecord, AttendanceStatus, Department, EmployeeImportRow, JobRole, UserRole,
};

use axum::{body::Body, http::Request};
use tower::ServiceExt;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
}

fn create_snapshot() -> ImportSnapshot {
    let departments = vec![Department {
        id: 1,
        name: "Technology & Infrastructure".to_string(),
        description: None,
    }];
    let roles = vec![JobRole {
        id: 1,
        title: "Software Engineer".to_string(),
        description: None,
    }];
    ImportSnapshot::new(departments, roles, ["existing@company.com"])
}

/// Rows where every tenth one has a malformed email.
fn create_rows(count: usize) -> Vec<EmployeeImportRow> {
    (1..=count)
        .map(|n| EmployeeImportRow {
            row_number: n,
            name: format!("Employee {}", n),
            email: if n % 10 == 0 {
                format!("employee{}-at-company.com", n)
            } else {
                format!("employee{}@company.com", n)
            },
            phone: "555-1234".to_string(),
            department_name: "technology & infrastructure".to_string(),
            role_name: "Software Engineer".to_string(),
            salary: "75000".to_string(),
            date_joined: "2024-01-15".to_string(),
        })
        .collect()
}

fn create_records(count: usize) -> Vec<AttendanceRecord> {
    let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
    (0..count)
        .map(|n| {
            let status = match n % 4 {
                0 | 1 => AttendanceStatus::Present,
                2 => AttendanceStatus::Absent,
                _ => AttendanceStatus::Late,
            };
            AttendanceRecord::new((n % 50) as u64 + 1, start + Duration::days((n / 50) as i64), status)
        })
        .collect()
}

/// Benchmark: batch validation at several sizes.
fn bench_import_validation(c: &mut Criterion) {
    let rules = FieldRules::from_config(&ValidationConfig::default()).unwrap();
    let validator = BulkImportValidator::new(&rules, today());
    let snapshot = create_snapshot();

    let mut group = c.benchmark_group("import_validation");

    for row_count in [100usize, 1000].iter() {
        let rows = create_rows(*row_count);

        group.throughput(Throughput::Elements(*row_count as u64));
        group.bench_with_input(BenchmarkId::new("rows", row_count), row_count, |b, _| {
            b.iter(|| black_box(validator.validate_batch(black_box(&rows), &snapshot)))
        });
    }

    group.finish();
}

/// Benchmark: attendance aggregation over 10,000 records.
fn bench_attendance(c: &mut Criterion) {
    let records = create_records(10_000);

    c.bench_function("attendance_percentage_10k", |b| {
        b.iter(|| black_box(attendance_percentage(black_box(&records))))
    });
    c.bench_function("summarize_attendance_10k", |b| {
        b.iter(|| black_box(summarize_attendance(black_box(&records))))
    });
}

/// Benchmark: GET /reports/attendance against a populated store.
fn bench_attendance_report_endpoint(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let config = ConfigLoader::load("./config/workflowx").expect("Failed to load config");
    let state = AppState::new(config).unwrap();

    let token = rt.block_on(async {
        state
            .add_user("admin", hash_password("admin123", 4).unwrap(), UserRole::Admin)
            .await
            .unwrap();

        {
            let mut store = state.store().write().await;
            let outcomes = BulkImportValidator::new(state.config().field_rules(), today())
                .validate_batch(&create_rows(50), &*store);
            workflowx::import::commit_import(outcomes, &mut *store);
            for record in create_records(5_000) {
                store
                    .mark_attendance(record.employee_id, record.date, record.status, None)
                    .ok();
            }
        }

        state.login("admin", "admin123").await.unwrap().token
    });

    let router = create_router(state);
    let authorization = format!("Bearer {}", token);

    c.bench_function("attendance_report_endpoint", |b| {
        b.to_async(&rt).iter(|| async {
            let router = router.clone();
            let response = router
                .oneshot(
                    Request::builder()
                        .method("GET")
                        .uri("/reports/attendance?start_date=2020-01-01&end_date=2020-12-31")
                        .header("Authorization", authorization.clone())
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();
            black_box(response)
        })
    });
}

criterion_group!(
    benches,
    bench_import_validation,
    bench_attendance,
    bench_attendance_report_endpoint,
);
criterion_main!(benches);
