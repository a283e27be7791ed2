use integration::setup::{TEST_DEVICE, TestContext};
use std::time::Duration;
use test_context::test_context;
use veles_lib::registers::lookup;
use veles_lib::{DeviceLock, Error, Request, read_value};

const LOCK_TIMEOUT: Duration = Duration::from_millis(300);

fn request(tctx: &TestContext, name: &str) -> Request {
    Request {
        register: lookup(name).unwrap(),
        link: tctx.link(),
    }
}

#[test_context(TestContext)]
#[tokio::test]
async fn check_read_temperature(tctx: &mut TestContext) {
    tctx.modbus_server.set(&[(0, 235)]);

    let reading = read_value(
        &tctx.connector,
        &request(tctx, "T"),
        tctx.lock_dir.path(),
        LOCK_TIMEOUT,
    )
    .await
    .unwrap();
    assert_eq!(reading.raw, 235);
    assert_eq!(reading.to_string(), "23.5°C");
}

#[test_context(TestContext)]
#[tokio::test]
async fn check_read_co2(tctx: &mut TestContext) {
    tctx.modbus_server.set(&[(0, 235), (3, 415)]);

    let reading = read_value(
        &tctx.connector,
        &request(tctx, "CO2"),
        tctx.lock_dir.path(),
        LOCK_TIMEOUT,
    )
    .await
    .unwrap();
    assert_eq!(reading.to_string(), "415ppm");
}

#[test_context(TestContext)]
#[tokio::test]
async fn check_read_frost(tctx: &mut TestContext) {
    tctx.modbus_server.set(&[(0, 0xFFCE)]);

    let reading = read_value(
        &tctx.connector,
        &request(tctx, "T"),
        tctx.lock_dir.path(),
        LOCK_TIMEOUT,
    )
    .await
    .unwrap();
    assert_eq!(reading.to_string(), "-5.0°C");
}

#[test_context(TestContext)]
#[tokio::test]
async fn check_illegal_request_releases_lock(tctx: &mut TestContext) {
    // Answers the probe, but has no PMC error register.
    tctx.modbus_server.set(&[(0, 235)]);

    let err = read_value(
        &tctx.connector,
        &request(tctx, "READ_ERR_PMC"),
        tctx.lock_dir.path(),
        LOCK_TIMEOUT,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, Error::IllegalRequest { index: 20, .. }));
    assert_eq!(err.diagnostic(), "unknown");

    DeviceLock::acquire_in(tctx.lock_dir.path(), TEST_DEVICE, Duration::ZERO)
        .await
        .unwrap();
}

#[test_context(TestContext)]
#[tokio::test]
async fn check_failed_probe_is_busy(tctx: &mut TestContext) {
    // Nothing is served, so negotiation is refused.
    let err = read_value(
        &tctx.connector,
        &request(tctx, "CO2"),
        tctx.lock_dir.path(),
        LOCK_TIMEOUT,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, Error::DeviceBusy { ref device, .. } if device == TEST_DEVICE));
    assert_eq!(err.diagnostic(), "device busy");
}

#[test_context(TestContext)]
#[tokio::test]
async fn check_held_lock_skips_device(tctx: &mut TestContext) {
    tctx.modbus_server.set(&[(0, 235), (3, 415)]);
    let held = DeviceLock::acquire_in(tctx.lock_dir.path(), TEST_DEVICE, LOCK_TIMEOUT)
        .await
        .unwrap();

    let err = read_value(
        &tctx.connector,
        &request(tctx, "CO2"),
        tctx.lock_dir.path(),
        LOCK_TIMEOUT,
    )
    .await
    .unwrap_err();
    assert_eq!(err.diagnostic(), "device busy");
    drop(held);

    // The port was never taken, so the next readout still gets it.
    let reading = read_value(
        &tctx.connector,
        &request(tctx, "CO2"),
        tctx.lock_dir.path(),
        LOCK_TIMEOUT,
    )
    .await
    .unwrap();
    assert_eq!(reading.to_string(), "415ppm");
}
