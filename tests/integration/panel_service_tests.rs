//! PanelService scenarios against the scripted mock host.

use chrono::NaiveDate;
use irrigation_panel::adapters::clock::FixedClock;
use irrigation_panel::app::commands::Action;
use irrigation_panel::app::events::PanelEvent;
use irrigation_panel::binner::{CalendarEvent, EventStart};
use irrigation_panel::calendar::{GRID_CELLS, MonthRef};
use irrigation_panel::classify::{EventCategory, MoistureBand};
use irrigation_panel::state::{FullStatus, StateRecord};
use irrigation_panel::view_model::{ControllerStatus, DashboardView};
use irrigation_panel::{Error, PanelConfig, PanelService, PortError};

use crate::mock_host::{MockHost, RecordingSink, ZONE_1, ZONE_2, date};

fn service() -> PanelService {
    PanelService::new(PanelConfig::default()).unwrap()
}

fn clock() -> FixedClock {
    FixedClock(date(2024, 6, 10))
}

fn june() -> MonthRef {
    MonthRef::new(2024, 5)
}

// ── Dashboard refresh ──

#[test]
fn refresh_builds_dashboard_from_snapshot() {
    let mut app = service();
    let mut host = MockHost::with_sample_state();
    let mut sink = RecordingSink::new();

    app.refresh(&mut host, &mut sink).unwrap();

    let dash = app.dashboard();
    assert_eq!(dash.status, ControllerStatus::Scheduled);
    assert!(!dash.is_running);
    assert!(dash.ai.will_water);
    assert_eq!(dash.ai.reason, "Dry soil in 1 zone");

    let ids: Vec<_> = dash.zones.iter().map(|z| z.id.as_str()).collect();
    assert_eq!(ids, [ZONE_1, ZONE_2]);
    assert_eq!(dash.zones[0].name, "Front Lawn");
    assert_eq!(
        dash.zones[0].moisture.map(|m| m.band),
        Some(MoistureBand::Dry)
    );
    assert!(dash.zones[1].moisture.is_none());

    let next = dash.next_run.as_ref().unwrap();
    assert_eq!(next.zones_to_water, Some(1));
    assert!(next.at.is_some());

    assert_eq!(
        sink.events,
        vec![PanelEvent::DashboardRefreshed {
            status: ControllerStatus::Scheduled,
            zones: 2,
            refresh_count: 1,
        }]
    );
}

#[test]
fn failed_refresh_keeps_previous_dashboard() {
    let mut app = service();
    let mut host = MockHost::with_sample_state();
    let mut sink = RecordingSink::new();
    app.refresh(&mut host, &mut sink).unwrap();
    let before = app.dashboard().clone();

    host.fail_snapshot = Some(PortError::Timeout);
    let err = app.refresh(&mut host, &mut sink).unwrap_err();

    assert_eq!(err, Error::Port(PortError::Timeout));
    assert_eq!(app.dashboard(), &before);
    assert_eq!(app.dashboard_error(), Some(PortError::Timeout));
    assert_eq!(app.refresh_count(), 1);
    assert_eq!(
        sink.last(),
        Some(&PanelEvent::RefreshFailed(PortError::Timeout))
    );

    host.fail_snapshot = None;
    app.refresh(&mut host, &mut sink).unwrap();
    assert_eq!(app.dashboard_error(), None);
    assert_eq!(app.refresh_count(), 2);
}

#[test]
fn empty_snapshot_gives_neutral_dashboard() {
    let mut app = service();
    let mut host = MockHost::new();
    app.refresh(&mut host, &mut RecordingSink::new()).unwrap();
    assert_eq!(app.dashboard(), &DashboardView::default());
    assert_eq!(app.dashboard().status, ControllerStatus::Idle);
}

#[test]
fn full_status_fills_model_and_running_fallback() {
    let mut app = service();
    let mut host = MockHost::new();
    host.full_status = Some(FullStatus {
        zones_configured: Some(4),
        is_running: Some(true),
        ..FullStatus::default()
    });

    app.refresh(&mut host, &mut RecordingSink::new()).unwrap();

    let dash = app.dashboard();
    assert!(dash.is_running);
    assert_eq!(dash.status, ControllerStatus::Running);
    assert_eq!(dash.model.as_ref().unwrap().zones_configured, Some(4));
}

#[test]
fn rain_delay_outranks_running() {
    let mut app = service();
    let mut host = MockHost::with_sample_state();
    host.snapshot.insert(
        StateRecord::new("sensor.smart_irrigation_ai_status", "water")
            .with_attr("zones_needing_water", 2)
            .with_attr("rain_delay_until", "2024-06-12T00:00:00+00:00"),
    );
    host.snapshot
        .insert(StateRecord::new("binary_sensor.smart_irrigation_is_running", "on"));

    app.refresh(&mut host, &mut RecordingSink::new()).unwrap();
    assert_eq!(app.dashboard().status, ControllerStatus::RainDelay);
    assert!(app.dashboard().is_running);
}

// ── Refresh timer ──

#[test]
fn tick_refreshes_once_per_interval() {
    let mut app = service();
    let mut host = MockHost::with_sample_state();
    let mut sink = RecordingSink::new();
    app.start(&mut sink).unwrap();

    for _ in 0..29 {
        assert!(!app.tick(1.0, &mut host, &mut sink));
    }
    assert_eq!(host.snapshot_calls, 0);

    assert!(app.tick(1.0, &mut host, &mut sink));
    assert_eq!(host.snapshot_calls, 1);

    // A single long gap still refreshes once.
    assert!(app.tick(300.0, &mut host, &mut sink));
    assert_eq!(host.snapshot_calls, 2);
    assert_eq!(app.refresh_count(), 2);
}

#[test]
fn tick_does_nothing_before_start_or_after_stop() {
    let mut app = service();
    let mut host = MockHost::with_sample_state();
    let mut sink = RecordingSink::new();

    assert!(!app.tick(60.0, &mut host, &mut sink));

    app.start(&mut sink).unwrap();
    assert!(app.stop(&mut sink));
    assert!(!app.tick(60.0, &mut host, &mut sink));
    assert_eq!(host.snapshot_calls, 0);
    assert_eq!(
        sink.events,
        vec![
            PanelEvent::Started { interval_secs: 30 },
            PanelEvent::Stopped,
        ]
    );
}

#[test]
fn failed_tick_refresh_is_recorded_not_returned() {
    let mut app = service();
    let mut host = MockHost::with_sample_state();
    host.fail_snapshot = Some(PortError::Unavailable);
    let mut sink = RecordingSink::new();
    app.start(&mut sink).unwrap();

    assert!(app.tick(30.0, &mut host, &mut sink));
    assert_eq!(app.dashboard_error(), Some(PortError::Unavailable));
    assert!(app.is_active());
}

#[test]
fn restart_after_stop_rearms() {
    let mut app = service();
    let mut host = MockHost::with_sample_state();
    let mut sink = RecordingSink::new();

    app.start(&mut sink).unwrap();
    app.tick(20.0, &mut host, &mut sink);
    app.stop(&mut sink);
    app.start(&mut sink).unwrap();

    // Fresh interval: the 20s ticked before the stop are gone.
    assert!(!app.tick(20.0, &mut host, &mut sink));
    assert!(app.tick(10.0, &mut host, &mut sink));
}

// ── Dispose ──

#[test]
fn dispose_clears_views_and_rejects_work() {
    let mut app = service();
    let mut host = MockHost::with_sample_state();
    let mut sink = RecordingSink::new();
    app.start(&mut sink).unwrap();
    app.refresh(&mut host, &mut sink).unwrap();
    app.set_month(june(), &mut host, &clock(), &mut sink).unwrap();

    app.dispose(&mut sink);
    assert!(app.is_disposed());
    assert!(!app.is_active());
    assert!(app.calendar().is_none());
    assert_eq!(app.dashboard(), &DashboardView::default());
    assert_eq!(
        sink.count(|e| matches!(e, PanelEvent::Disposed)),
        1
    );

    let emitted = sink.events.len();
    assert_eq!(app.refresh(&mut host, &mut sink), Err(Error::Disposed));
    assert_eq!(
        app.set_month(june(), &mut host, &clock(), &mut sink),
        Err(Error::Disposed)
    );
    assert_eq!(
        app.invoke_action(Action::StopAll, &mut host, &mut sink),
        Err(Error::Disposed)
    );
    assert!(!app.tick(60.0, &mut host, &mut sink));
    app.dispose(&mut sink);
    assert_eq!(sink.events.len(), emitted);
    assert!(host.actions.is_empty());
}

// ── Calendar ──

#[test]
fn set_month_queries_visible_range_of_configured_entity() {
    let mut app = service();
    let mut host = MockHost::new();
    app.set_month(june(), &mut host, &clock(), &mut RecordingSink::new())
        .unwrap();

    let q = host.last_query().unwrap();
    assert_eq!(q.entity, "calendar.smart_irrigation_schedule");
    // June 2024 starts on a Saturday.
    assert_eq!(q.start, date(2024, 5, 26).and_hms_opt(0, 0, 0).unwrap());
    assert_eq!(q.end, date(2024, 7, 7).and_hms_opt(0, 0, 0).unwrap());

    let grid = app.calendar().unwrap();
    assert_eq!(grid.cells().len(), GRID_CELLS);
    assert!(grid.cell(date(2024, 6, 10)).unwrap().is_today);
}

#[test]
fn crowded_day_shows_three_and_counts_the_rest() {
    let mut app = service();
    let mut host = MockHost::new();
    let day = date(2024, 6, 12);
    host.events = vec![
        CalendarEvent::all_day(day, "Watering Completed"),
        CalendarEvent::all_day(day, "Skipped: rain forecast"),
        CalendarEvent::all_day(day, "Rain Delay"),
        CalendarEvent::all_day(day, "Zone 4"),
        CalendarEvent::all_day(day, "Zone 5"),
        // Outside the visible range.
        CalendarEvent::all_day(date(2024, 8, 1), "Zone 1"),
    ];
    let mut sink = RecordingSink::new();

    app.set_month(june(), &mut host, &clock(), &mut sink).unwrap();

    let cell = app.calendar().unwrap().cell(day).unwrap();
    let cats: Vec<_> = cell.displayed_events.iter().map(|e| e.category).collect();
    assert_eq!(
        cats,
        [
            EventCategory::Completed,
            EventCategory::Skipped,
            EventCategory::RainDelay
        ]
    );
    assert_eq!(cell.displayed_events[0].summary, "Watering Comple");
    assert_eq!(cell.overflow_count, 2);
    assert_eq!(
        sink.last(),
        Some(&PanelEvent::CalendarUpdated {
            month: june(),
            events: 5
        })
    );
}

#[test]
fn set_month_twice_gives_identical_grid() {
    let mut app = service();
    let mut host = MockHost::new();
    host.events = vec![
        CalendarEvent::all_day(date(2024, 6, 3), "Zone 1"),
        CalendarEvent::new(
            "2024-06-03T06:00:00+02:00".parse::<EventStart>().unwrap(),
            "Zone 2",
        ),
    ];
    let mut sink = RecordingSink::new();

    app.set_month(june(), &mut host, &clock(), &mut sink).unwrap();
    let first = app.calendar().unwrap().clone();
    app.set_month(june(), &mut host, &clock(), &mut sink).unwrap();

    assert_eq!(app.calendar().unwrap(), &first);
    assert_eq!(first.cell(date(2024, 6, 3)).unwrap().event_count(), 2);
}

#[test]
fn failed_refetch_of_same_month_keeps_grid() {
    let mut app = service();
    let mut host = MockHost::new();
    host.events = vec![CalendarEvent::all_day(date(2024, 6, 3), "Zone 1")];
    let mut sink = RecordingSink::new();
    app.set_month(june(), &mut host, &clock(), &mut sink).unwrap();
    let before = app.calendar().unwrap().clone();

    host.fail_calendar = Some(PortError::Unavailable);
    let err = app.set_month(june(), &mut host, &clock(), &mut sink);

    assert_eq!(err, Err(Error::Port(PortError::Unavailable)));
    assert_eq!(app.calendar().unwrap(), &before);
    assert_eq!(app.calendar_error(), Some(PortError::Unavailable));
    assert_eq!(
        sink.last(),
        Some(&PanelEvent::CalendarFetchFailed {
            month: june(),
            error: PortError::Unavailable
        })
    );
}

#[test]
fn failed_fetch_of_new_month_shows_empty_grid() {
    let mut app = service();
    let mut host = MockHost::new();
    host.events = vec![CalendarEvent::all_day(date(2024, 6, 3), "Zone 1")];
    let mut sink = RecordingSink::new();
    app.set_month(june(), &mut host, &clock(), &mut sink).unwrap();

    host.fail_calendar = Some(PortError::Timeout);
    assert!(app.next_month(&mut host, &clock(), &mut sink).is_err());

    let grid = app.calendar().unwrap();
    assert_eq!(grid.month(), MonthRef::new(2024, 6));
    assert_eq!(grid.event_count(), 0);
    assert_eq!(app.calendar_error(), Some(PortError::Timeout));

    host.fail_calendar = None;
    app.set_month(MonthRef::new(2024, 6), &mut host, &clock(), &mut sink)
        .unwrap();
    assert_eq!(app.calendar_error(), None);
}

#[test]
fn navigation_wraps_year_boundaries() {
    let mut app = service();
    let mut host = MockHost::new();
    let mut sink = RecordingSink::new();
    let clock = FixedClock(date(2024, 12, 31));

    // Without a month on screen, navigation starts from today's month.
    app.next_month(&mut host, &clock, &mut sink).unwrap();
    assert_eq!(app.month(), Some(MonthRef::new(2025, 0)));

    app.previous_month(&mut host, &clock, &mut sink).unwrap();
    app.previous_month(&mut host, &clock, &mut sink).unwrap();
    assert_eq!(app.month(), Some(MonthRef::new(2024, 10)));

    app.current_month(&mut host, &clock, &mut sink).unwrap();
    assert_eq!(app.month(), Some(MonthRef::new(2024, 11)));
    let grid = app.calendar().unwrap();
    assert_eq!(grid.first_day(), NaiveDate::from_ymd_opt(2024, 12, 1).unwrap());
}

// ── Actions ──

#[test]
fn run_zone_defaults_to_recommended_duration() {
    let mut app = service();
    let mut host = MockHost::with_sample_state();
    let mut sink = RecordingSink::new();
    app.refresh(&mut host, &mut sink).unwrap();

    app.invoke_action(
        Action::RunZone {
            zone_id: ZONE_1.into(),
            duration_minutes: None,
        },
        &mut host,
        &mut sink,
    )
    .unwrap();
    app.invoke_action(
        Action::RunZone {
            zone_id: ZONE_2.into(),
            duration_minutes: None,
        },
        &mut host,
        &mut sink,
    )
    .unwrap();

    assert_eq!(
        host.actions,
        vec![
            Action::RunZone {
                zone_id: ZONE_1.into(),
                duration_minutes: Some(12),
            },
            Action::RunZone {
                zone_id: ZONE_2.into(),
                duration_minutes: Some(10),
            },
        ]
    );
}

#[test]
fn explicit_duration_is_kept() {
    let mut app = service();
    let mut host = MockHost::with_sample_state();
    app.refresh(&mut host, &mut RecordingSink::new()).unwrap();

    let action = Action::RunZone {
        zone_id: ZONE_1.into(),
        duration_minutes: Some(3),
    };
    app.invoke_action(action.clone(), &mut host, &mut RecordingSink::new())
        .unwrap();
    assert_eq!(host.actions, vec![action]);
}

#[test]
fn rain_delay_defaults_to_configured_hours() {
    let mut app = PanelService::new(PanelConfig {
        rain_delay_hours: 48,
        ..PanelConfig::default()
    })
    .unwrap();
    let mut host = MockHost::new();

    app.invoke_action(
        Action::RainDelay { hours: None },
        &mut host,
        &mut RecordingSink::new(),
    )
    .unwrap();
    assert_eq!(host.actions, vec![Action::RainDelay { hours: Some(48) }]);
    assert_eq!(host.actions[0].params()["hours"], 48);
}

#[test]
fn action_refreshes_dashboard_afterwards() {
    let mut app = service();
    let mut host = MockHost::with_sample_state();
    let mut sink = RecordingSink::new();

    app.invoke_action(Action::CalculateSchedule, &mut host, &mut sink)
        .unwrap();

    assert_eq!(host.snapshot_calls, 1);
    assert_eq!(app.refresh_count(), 1);
    assert_eq!(
        sink.events[0],
        PanelEvent::ActionInvoked {
            service: "calculate_schedule"
        }
    );
    assert!(matches!(
        sink.events[1],
        PanelEvent::DashboardRefreshed { .. }
    ));
}

#[test]
fn failed_action_still_refreshes_and_reports_action_error() {
    let mut app = service();
    let mut host = MockHost::with_sample_state();
    host.fail_action = Some(PortError::Rejected);
    host.fail_snapshot = Some(PortError::Timeout);
    let mut sink = RecordingSink::new();

    let err = app.invoke_action(Action::StopAll, &mut host, &mut sink);

    assert_eq!(err, Err(Error::Port(PortError::Rejected)));
    assert_eq!(host.snapshot_calls, 1);
    assert_eq!(app.dashboard_error(), Some(PortError::Timeout));
    assert_eq!(
        sink.events,
        vec![
            PanelEvent::ActionFailed {
                service: "stop_all",
                error: PortError::Rejected
            },
            PanelEvent::RefreshFailed(PortError::Timeout),
        ]
    );
}

#[test]
fn refresh_error_surfaces_when_action_succeeds() {
    let mut app = service();
    let mut host = MockHost::new();
    host.fail_snapshot = Some(PortError::Unavailable);

    let err = app.invoke_action(
        Action::SkipNextWatering { zone_id: None },
        &mut host,
        &mut RecordingSink::new(),
    );
    assert_eq!(err, Err(Error::Port(PortError::Unavailable)));
    assert_eq!(host.actions.len(), 1);
}
