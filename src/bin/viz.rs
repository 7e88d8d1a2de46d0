use eframe::egui;
use egui_plot::{Legend, Line, Plot, PlotPoints};

use mech_sim::analysis::{derive, DerivedSeries};
use mech_sim::dynamics::{CoupledOscillators, DampedDrivenOscillator, StateVector, TimeSeries};
use mech_sim::sim::{run_for, IntegratorKind};
use mech_sim::ConfigError;

fn main() -> eframe::Result {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let app = SimViz::default();
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1200.0, 800.0]),
        ..Default::default()
    };
    eframe::run_native("Oscillator Lab", options, Box::new(|_| Ok(Box::new(app))))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tab {
    Oscillator,
    Coupled,
}

/// Slider-backed settings. Every change rebuilds the parameter struct and
/// re-runs the simulation; nothing else is shared with the library.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Controls {
    integrator: IntegratorKind,
    dt: f64,
    duration: f64,
    // oscillator
    damping: f64,
    drive_amplitude: f64,
    drive_ratio: f64,
    // coupled
    coupling: f64,
    x1: f64,
    x2: f64,
}

impl Default for Controls {
    fn default() -> Self {
        Self {
            integrator: IntegratorKind::Rk4,
            dt: 0.01,
            duration: 10.0,
            damping: 0.5,
            drive_amplitude: 0.5,
            drive_ratio: 1.5,
            coupling: 0.1,
            x1: 1.0,
            x2: 0.0,
        }
    }
}

struct Run<const N: usize> {
    series: TimeSeries<N>,
    derived: DerivedSeries,
}

struct SimViz {
    tab: Tab,
    controls: Controls,
    oscillator: Result<Run<2>, ConfigError>,
    coupled: Result<Run<4>, ConfigError>,
}

impl Default for SimViz {
    fn default() -> Self {
        let controls = Controls::default();
        Self {
            tab: Tab::Oscillator,
            controls,
            oscillator: simulate_oscillator(&controls),
            coupled: simulate_coupled(&controls),
        }
    }
}

fn simulate_oscillator(c: &Controls) -> Result<Run<2>, ConfigError> {
    let base = DampedDrivenOscillator::default();
    let osc = DampedDrivenOscillator {
        damping: c.damping,
        drive_amplitude: c.drive_amplitude,
        drive_frequency: c.drive_ratio * base.natural_frequency(),
        ..base
    };
    let series = run_for(&osc, StateVector::<2>::new(1.0, 0.0), c.dt, c.duration, c.integrator)?;
    let derived = derive(&series, &osc);
    Ok(Run { series, derived })
}

fn simulate_coupled(c: &Controls) -> Result<Run<4>, ConfigError> {
    let sys = CoupledOscillators { coupling: c.coupling, ..Default::default() };
    let initial = StateVector::<4>::new(c.x1, 0.0, c.x2, 0.0);
    let series = run_for(&sys, initial, c.dt, c.duration * 4.0, c.integrator)?;
    let derived = derive(&series, &sys);
    Ok(Run { series, derived })
}

/// Downsample to at most ~2000 points per line.
fn sampled<T>(items: &[T]) -> impl Iterator<Item = &T> {
    items.iter().step_by((items.len() / 2000).max(1))
}

fn time_plot(ui: &mut egui::Ui, id: &str, w: f32, h: f32, lines: Vec<(&str, Vec<[f64; 2]>)>) {
    Plot::new(id)
        .width(w)
        .height(h)
        .x_axis_label("Time (s)")
        .legend(Legend::default())
        .show(ui, |plot_ui| {
            for (name, points) in lines {
                plot_ui.line(Line::new(name, PlotPoints::from(points)));
            }
        });
}

fn energy_lines(derived: &DerivedSeries) -> Vec<(&'static str, Vec<[f64; 2]>)> {
    let d = &derived.samples;
    vec![
        ("Kinetic", sampled(d).map(|s| [s.time, s.kinetic]).collect()),
        ("Potential", sampled(d).map(|s| [s.time, s.potential]).collect()),
        ("Total", sampled(d).map(|s| [s.time, s.total]).collect()),
    ]
}

impl SimViz {
    fn control_panel(&mut self, ui: &mut egui::Ui) {
        let mut c = self.controls;
        ui.horizontal(|ui| {
            ui.selectable_value(&mut self.tab, Tab::Oscillator, "Damped / driven");
            ui.selectable_value(&mut self.tab, Tab::Coupled, "Coupled masses");
            ui.separator();
            for kind in IntegratorKind::ALL {
                ui.radio_value(&mut c.integrator, kind, kind.name());
            }
            ui.add(egui::Slider::new(&mut c.dt, 0.001..=0.1).logarithmic(true).text("dt (s)"));
        });
        ui.horizontal(|ui| match self.tab {
            Tab::Oscillator => {
                ui.add(egui::Slider::new(&mut c.damping, 0.0..=1.0).step_by(0.1).text("damping"));
                ui.add(egui::Slider::new(&mut c.drive_amplitude, 0.0..=1.0).step_by(0.1).text("F0"));
                ui.add(egui::Slider::new(&mut c.drive_ratio, 0.0..=3.0).text("wd / w0"));
            }
            Tab::Coupled => {
                ui.add(egui::Slider::new(&mut c.coupling, 0.0..=2.0).text("coupling"));
                ui.add(egui::Slider::new(&mut c.x1, -1.0..=1.0).text("x1(0)"));
                ui.add(egui::Slider::new(&mut c.x2, -1.0..=1.0).text("x2(0)"));
            }
        });

        if c != self.controls {
            self.controls = c;
            self.oscillator = simulate_oscillator(&c);
            self.coupled = simulate_coupled(&c);
        }
    }

    fn oscillator_plots(&self, ui: &mut egui::Ui, run: &Run<2>) {
        let available = ui.available_size();
        let half_w = available.x / 2.0 - 8.0;
        let half_h = available.y / 2.0 - 8.0;
        let s = run.series.samples();

        ui.horizontal(|ui| {
            ui.vertical(|ui| {
                ui.label("Displacement (m)");
                let x = sampled(s).map(|p| [p.time, p.state[0]]).collect();
                time_plot(ui, "osc_x", half_w, half_h, vec![("x", x)]);
            });
            ui.vertical(|ui| {
                ui.label("Energy (J)");
                time_plot(ui, "osc_energy", half_w, half_h, energy_lines(&run.derived));
            });
        });
        ui.vertical(|ui| {
            ui.label("Phase space");
            let points: PlotPoints = sampled(s).map(|p| [p.state[0], p.state[1]]).collect();
            Plot::new("osc_phase")
                .width(half_w)
                .height(half_h)
                .x_axis_label("x (m)")
                .y_axis_label("v (m/s)")
                .show(ui, |plot_ui| plot_ui.line(Line::new("(x, v)", points)));
        });
    }

    fn coupled_plots(&self, ui: &mut egui::Ui, run: &Run<4>) {
        let available = ui.available_size();
        let half_w = available.x / 2.0 - 8.0;
        let half_h = available.y / 2.0 - 8.0;
        let s = run.series.samples();
        let d = &run.derived.samples;

        ui.horizontal(|ui| {
            ui.vertical(|ui| {
                ui.label("Displacements (m)");
                let x1 = sampled(s).map(|p| [p.time, p.state[0]]).collect();
                let x2 = sampled(s).map(|p| [p.time, p.state[2]]).collect();
                time_plot(ui, "cpl_x", half_w, half_h, vec![("x1", x1), ("x2", x2)]);
            });
            ui.vertical(|ui| {
                ui.label("Normal modes");
                let modes: Vec<_> = sampled(d)
                    .filter_map(|p| p.normal_modes.map(|m| (p.time, m)))
                    .collect();
                let sym = modes.iter().map(|(t, m)| [*t, m.symmetric]).collect();
                let anti = modes.iter().map(|(t, m)| [*t, m.antisymmetric]).collect();
                time_plot(ui, "cpl_modes", half_w, half_h, vec![("symmetric", sym), ("antisymmetric", anti)]);
            });
        });
        ui.horizontal(|ui| {
            ui.vertical(|ui| {
                ui.label("Energy (J)");
                time_plot(ui, "cpl_energy", half_w, half_h, energy_lines(&run.derived));
            });
            ui.vertical(|ui| {
                ui.label("Phase space");
                let p1: PlotPoints = sampled(s).map(|p| [p.state[0], p.state[1]]).collect();
                let p2: PlotPoints = sampled(s).map(|p| [p.state[2], p.state[3]]).collect();
                Plot::new("cpl_phase")
                    .width(half_w)
                    .height(half_h)
                    .legend(Legend::default())
                    .show(ui, |plot_ui| {
                        plot_ui.line(Line::new("mass 1", p1));
                        plot_ui.line(Line::new("mass 2", p2));
                    });
            });
        });
    }
}

impl eframe::App for SimViz {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("controls").show(ctx, |ui| {
            ui.heading("Oscillator Lab");
            self.control_panel(ui);
        });

        egui::CentralPanel::default().show(ctx, |ui| match self.tab {
            Tab::Oscillator => match &self.oscillator {
                Ok(run) => self.oscillator_plots(ui, run),
                Err(e) => {
                    ui.colored_label(egui::Color32::RED, e.to_string());
                }
            },
            Tab::Coupled => match &self.coupled {
                Ok(run) => self.coupled_plots(ui, run),
                Err(e) => {
                    ui.colored_label(egui::Color32::RED, e.to_string());
                }
            },
        });
    }
}
