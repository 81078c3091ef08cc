use crate::config::DemoConfig;
use crate::scripted_input::{ScriptedPointerPlayer, ScriptedPointerStep};
use anyhow::{Context, Result};
use glam::{Vec2, Vec3};
use meshpick_interact::{
    Canvas, InteractionEvent, InteractionEventKind, InteractionHandler, InteractiveView,
    InteractiveViews, PointerEventKind, PointerEventManager, RadioButtonManager, RenderClock,
    StateMaterial, StateMaterialSet, StateMaterialSetParams,
};
use meshpick_scene::{
    BasicMaterial, Geometry, NodeId, PerspectiveCamera, Scene, Transform,
};
use meshpick_testkit::{EventLog, InteractionRecord, JsonlSink};
use std::path::PathBuf;
use tracing::{debug, info};

/// Label used for events raised by the radio group itself.
pub const RADIO_GROUP_LABEL: &str = "radio_group";

pub struct HeadlessConfig {
    pub demo: DemoConfig,
    pub script: Option<PathBuf>,
    pub event_log: Option<PathBuf>,
}

#[derive(Debug)]
pub struct RunSummary {
    pub frames: u64,
    pub log: EventLog,
    pub checkbox_selected: bool,
    pub selected_radio: Option<String>,
}

impl RunSummary {
    pub fn clicks(&self) -> usize {
        self.log.count(InteractionEventKind::Click)
    }
}

type Views = InteractiveViews<NodeId, BasicMaterial, &'static str>;

/// Demo widgets: a button, a checkbox, a billboard badge and three radios
/// behind a decorative glass pane.
pub struct DemoScene {
    pub scene: Scene,
    pub views: Views,
    pub radios: RadioButtonManager<NodeId>,
    pub button: NodeId,
    pub checkbox: NodeId,
    pub badge: NodeId,
    pub radio_nodes: Vec<NodeId>,
}

fn visual(name: &str, color: [f32; 3]) -> Option<StateMaterial<BasicMaterial>> {
    Some(StateMaterial::new(BasicMaterial::new(name, color)))
}

fn widget_materials(base: [f32; 3]) -> Result<StateMaterialSet<BasicMaterial>> {
    let lift = |c: [f32; 3], by: f32| [c[0] + by, c[1] + by, c[2] + by].map(|v| v.min(1.0));
    let set = StateMaterialSet::new(StateMaterialSetParams {
        normal: visual("normal", base),
        over: visual("over", lift(base, 0.2)),
        down: visual("down", lift(base, -0.2)),
        disable: visual("disable", [0.3, 0.3, 0.3]),
        normal_select: visual("normal_select", [0.2, 0.8, 0.3]),
        over_select: visual("over_select", [0.3, 0.9, 0.4]),
        down_select: None,
    })?;
    Ok(set)
}

fn at(x: f32, y: f32, z: f32) -> Transform {
    Transform::from_translation(Vec3::new(x, y, z))
}

impl DemoScene {
    pub fn build() -> Result<Self> {
        let mut scene = Scene::new();
        let mut views = Views::new();
        let mut radios = RadioButtonManager::new();

        scene.add_mesh(NodeId::ROOT, "backdrop", at(0.0, 0.0, -1.0), Geometry::plane(10.0, 6.0));
        scene.add_mesh(NodeId::ROOT, "glass", at(0.0, 0.0, 1.5), Geometry::plane(12.0, 7.0));

        let button = scene.add_group(NodeId::ROOT, "button", at(-2.5, 1.0, 0.0));
        scene.add_mesh(button, "button_face", Transform::default(), Geometry::cube(1.2));
        views.insert(InteractiveView::group(
            button,
            InteractionHandler::button(Some(widget_materials([0.6, 0.2, 0.2])?)).with_value("button"),
        ));

        let checkbox = scene.add_mesh(NodeId::ROOT, "checkbox", at(0.0, 1.0, 0.0), Geometry::cube(1.0));
        views.insert(InteractiveView::mesh(
            checkbox,
            InteractionHandler::checkbox(Some(widget_materials([0.2, 0.2, 0.6])?)).with_value("checkbox"),
        ));

        let badge = scene.add_mesh(NodeId::ROOT, "badge", at(2.5, 1.0, 0.0), Geometry::billboard(1.0, 1.0));
        views.insert(InteractiveView::sprite(
            badge,
            InteractionHandler::button(Some(widget_materials([0.6, 0.6, 0.2])?)).with_value("badge"),
        ));

        let mut radio_nodes = Vec::new();
        for (name, x) in [("radio_a", -2.0), ("radio_b", 0.0), ("radio_c", 2.0)] {
            let node = scene.add_mesh(NodeId::ROOT, name, at(x, -1.2, 0.0), Geometry::cube(0.9));
            views.insert(InteractiveView::mesh(
                node,
                InteractionHandler::radio(Some(widget_materials([0.4, 0.4, 0.4])?)).with_value(name),
            ));
            radio_nodes.push(node);
        }
        radios.add_buttons(radio_nodes.iter().copied());

        Ok(Self {
            scene,
            views,
            radios,
            button,
            checkbox,
            badge,
            radio_nodes,
        })
    }

    fn label(&self, node: NodeId) -> String {
        self.scene
            .node(node)
            .map(|n| n.name.clone())
            .unwrap_or_else(|| node.to_string())
    }

    /// Pointer offset at which `node`'s origin appears.
    fn screen_position(&self, node: NodeId, camera: &PerspectiveCamera, canvas: &Canvas) -> Vec2 {
        let world = self.scene.world_matrix(node).transform_point3(Vec3::ZERO);
        let ndc = camera.view_projection_matrix().project_point3(world);
        Vec2::new(
            (ndc.x + 1.0) * 0.5 * canvas.width,
            (1.0 - ndc.y) * 0.5 * canvas.height,
        )
    }

    /// Built-in script: click through the widgets, then leave the canvas.
    pub fn tour(&self, camera: &PerspectiveCamera, canvas: &Canvas) -> Vec<ScriptedPointerStep> {
        let order = [
            self.button,
            self.checkbox,
            self.badge,
            self.radio_nodes[0],
            self.radio_nodes[2],
            self.radio_nodes[2],
        ];
        let mut steps = Vec::new();
        for node in order {
            let at = self.screen_position(node, camera, canvas);
            steps.push(ScriptedPointerStep::new(PointerEventKind::Move, at, 4));
            steps.push(ScriptedPointerStep::new(PointerEventKind::Down, at, 2));
            steps.push(ScriptedPointerStep::new(PointerEventKind::Up, at, 4));
        }
        steps.push(ScriptedPointerStep::pause(5));
        steps.push(ScriptedPointerStep::new(PointerEventKind::Leave, Vec2::ZERO, 1));
        steps
    }
}

fn record(
    world: &DemoScene,
    frame: u64,
    events: &[InteractionEvent<NodeId>],
    group_events: &[InteractionEvent<NodeId>],
    log: &mut EventLog,
    sink: &mut Option<JsonlSink>,
) -> Result<()> {
    let records = events
        .iter()
        .map(|e| InteractionRecord::labelled(frame, e, world.label(e.target)))
        .chain(
            group_events
                .iter()
                .map(|e| InteractionRecord::labelled(frame, e, RADIO_GROUP_LABEL)),
        );
    for record in records {
        debug!(frame, kind = %record.kind, target = %record.target, "interaction");
        if let Some(sink) = sink.as_mut() {
            sink.write(&record)?;
        }
        log.push(record);
    }
    Ok(())
}

pub fn run(cfg: HeadlessConfig) -> Result<RunSummary> {
    let demo = &cfg.demo;
    let mut world = DemoScene::build().context("Failed to build demo scene")?;
    let camera = demo.camera.build(&demo.canvas);

    let mut player = match &cfg.script {
        Some(path) => ScriptedPointerPlayer::from_path(path)
            .with_context(|| format!("Failed to load pointer script {}", path.display()))?,
        None => ScriptedPointerPlayer::from_steps(world.tour(&camera, &demo.canvas))?,
    };

    let clock = RenderClock::new();
    let mut manager =
        PointerEventManager::new(camera, demo.canvas, clock.clone(), demo.pointer.clone())
            .context("Invalid pointer options")?;

    let mut sink = cfg.event_log.as_ref().map(JsonlSink::create).transpose()?;
    let mut log = EventLog::new();
    info!(
        frames = demo.frames,
        script_frames = player.total_frames(),
        frame_ms = demo.frame_ms,
        "running headless demo"
    );

    let mut frames = 0;
    while frames < demo.frames || !player.is_finished() {
        let frame = frames;
        frames += 1;
        clock.tick(demo.frame_ms);
        let Some(event) = player.advance() else {
            continue;
        };
        let fired = manager.handle_pointer_event(&world.scene, &mut world.views, &event);
        let grouped = world.radios.forward(&mut world.views, &fired);
        record(&world, frame, &fired, &grouped, &mut log, &mut sink)?;
    }

    let released = manager.dispose(&mut world.views);
    record(&world, frames, &released, &[], &mut log, &mut sink)?;
    if let Some(sink) = sink.as_mut() {
        sink.flush()?;
    }

    let checkbox_selected = world
        .views
        .handler(world.checkbox)
        .and_then(|h| h.selection())
        .unwrap_or(false);
    let selected_radio = world.radios.selected().map(|node| world.label(node));
    info!(
        events = log.len(),
        checkbox_selected,
        selected_radio = selected_radio.as_deref().unwrap_or("none"),
        "headless demo finished"
    );

    Ok(RunSummary {
        frames,
        log,
        checkbox_selected,
        selected_radio,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use meshpick_interact::InteractionEventKind as Kind;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn run_default(demo: DemoConfig, event_log: Option<PathBuf>) -> RunSummary {
        run(HeadlessConfig {
            demo,
            script: None,
            event_log,
        })
        .expect("demo runs")
    }

    #[test]
    fn tour_clicks_every_widget() {
        let summary = run_default(DemoConfig::default(), None);
        let log = &summary.log;

        assert_eq!(
            log.kinds_for("button"),
            vec![Kind::Over, Kind::Down, Kind::Up, Kind::Click, Kind::Out]
        );
        assert!(summary.checkbox_selected);
        assert_eq!(log.kinds_for("badge").iter().filter(|k| **k == Kind::Click).count(), 1);
        assert_eq!(summary.selected_radio.as_deref(), Some("radio_c"));
        // radio_a then radio_c; the repeat click on radio_c is inert.
        assert_eq!(log.for_target(RADIO_GROUP_LABEL).count(), 2);
        assert_eq!(summary.clicks(), 5);
        assert!(log.for_target("glass").next().is_none());
        assert!(summary.frames >= 240);
    }

    #[test]
    fn presses_survive_heavy_throttling() {
        let mut demo = DemoConfig::default();
        demo.frame_ms = 1.0;
        demo.pointer.throttling_time_ms = 1000.0;
        let summary = run_default(demo, None);
        assert_eq!(summary.clicks(), 5);
        assert_eq!(summary.selected_radio.as_deref(), Some("radio_c"));
    }

    #[test]
    fn event_log_mirrors_the_run() {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let path = std::env::temp_dir().join(format!("meshpick-run-{nanos}/events.jsonl"));
        let summary = run_default(DemoConfig::default(), Some(path.clone()));
        let written = meshpick_testkit::read_jsonl(&path).expect("log readable");
        assert_eq!(written, summary.log.records());
    }

    #[test]
    fn bundled_script_replays() {
        let script = PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/demos/click_tour.json"));
        let summary = run(HeadlessConfig {
            demo: DemoConfig::default(),
            script: Some(script),
            event_log: None,
        })
        .expect("script runs");
        assert_eq!(summary.clicks(), 3);
        assert!(summary.checkbox_selected);
        assert_eq!(summary.selected_radio.as_deref(), Some("radio_a"));
        assert_eq!(summary.log.records().last().unwrap().kind, Kind::Out);
    }

    #[test]
    fn missing_script_is_an_error() {
        let result = run(HeadlessConfig {
            demo: DemoConfig::default(),
            script: Some(PathBuf::from("does/not/exist.json")),
            event_log: None,
        });
        assert!(result.is_err());
    }

    #[test]
    fn invalid_throttling_is_reported() {
        let mut demo = DemoConfig::default();
        demo.pointer.throttling_time_ms = -1.0;
        let result = run(HeadlessConfig {
            demo,
            script: None,
            event_log: None,
        });
        assert!(result.is_err());
    }
}
