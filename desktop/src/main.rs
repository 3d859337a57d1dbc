// Prevent console window in addition to Slint window in Windows release builds when, e.g., starting the app via file manager. Ignored on other platforms.
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use std::time::Duration;

use anyhow::{anyhow, Result};
use slint::ComponentHandle;
use sensor_monitor_common::config::MonitorConfig;
use sensor_monitor_common::source::{LinkState, SensorSourcePointer, SensorUpdate};
use sensor_monitor_common::ValueStore;
use sensor_monitor_desktop::{app, AppWindow, ViewModel};
use sensor_monitor_hardware::AlertOutputSharedPointer;

/// Our App struct that holds the UI, the sensor source and the timer that
/// drains listener updates into the window on the event-loop thread.
struct App {
    ui: AppWindow,
    source: SensorSourcePointer,
    alert_output: AlertOutputSharedPointer,
    updates: ValueStore<SensorUpdate>,
    link: ValueStore<LinkState>,
    timer: slint::Timer,
}

impl App {
    const DRAIN_INTERVAL: Duration = Duration::from_millis(200);

    fn new() -> Result<Self> {
        let config = MonitorConfig::from_env();
        config.log();

        let ui = AppWindow::new()?;

        let alert_output = app::open_alert_output(config.alert_pin)?;
        let source = app::build_source(&config, alert_output.clone())?;

        Ok(Self {
            ui,
            source,
            alert_output,
            updates: ValueStore::default(),
            link: ValueStore::default(),
            timer: slint::Timer::default(),
        })
    }

    fn run(&mut self) -> Result<()> {
        self.source
            .start(self.updates.clone(), self.link.clone())
            .map_err(|err| anyhow!("failed to start sensor source: {err}"))?;

        let ui_handle = self.ui.as_weak();
        let updates = self.updates.clone();
        let link = self.link.clone();
        let mut last_update = None;

        self.timer
            .start(slint::TimerMode::Repeated, Self::DRAIN_INTERVAL, move || {
                let ui = ui_handle.unwrap();
                let vm = ui.global::<ViewModel>();

                if let Some(update) = updates.take() {
                    last_update = Some(update.received);
                    app::apply_update(&vm, &update);
                }
                vm.set_status_text(app::status_text(link.peek().as_ref(), last_update).into());
            });

        self.ui.run()?;

        // Release the alert output once the window is closed, like the
        // original cleanup on exit.
        if let Ok(mut output) = self.alert_output.lock() {
            output.set_active(false);
        }
        Ok(())
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let mut app = App::new()?;
    app.run()
}
