// Host-side tests for the drone scene description and its mounting order.

use wavefield_core::*;

fn make_scene(seed: u64) -> (SessionParams, AudioScene) {
    let config = SessionConfig::default();
    let mut seed = ParameterSeed::from_seed(seed);
    let params = SessionParams::draw(&config, &mut seed);
    let scene = AudioSceneBuilder::new(&config, &params).build(&mut seed);
    (params, scene)
}

#[test]
fn chain_has_seven_stages_in_order_for_every_session() {
    for s in 0..50 {
        let (_, scene) = make_scene(s);
        let names: Vec<&str> = scene.chain.stages().iter().map(ChainStage::name).collect();
        assert_eq!(
            names,
            [
                "envelope",
                "feedback-delay",
                "low-shelf",
                "distortion",
                "lowpass",
                "reverb",
                "limiter"
            ]
        );
    }
}

#[test]
fn chain_stage_settings() {
    let chain = SignalChain::drone();
    assert_eq!(chain.len(), 7);
    assert_eq!(
        chain.stages()[0],
        ChainStage::Envelope {
            attack: 6.0,
            decay: 0.1,
            sustain: 1.0,
            release: 1.0
        }
    );
    assert_eq!(chain.stages()[6], ChainStage::Limiter { threshold_db: -0.1 });
}

#[test]
fn low_shelf_is_two_sections_and_lowpass_one() {
    let chain = SignalChain::drone();
    let sections: Vec<u32> = chain.stages().iter().map(ChainStage::filter_sections).collect();
    assert_eq!(sections, vec![1, 1, 2, 1, 1, 1, 1]);
}

#[test]
fn ensemble_size_follows_the_rare_flag() {
    let mut seen_rare = false;
    for s in 0..400 {
        let (params, scene) = make_scene(s);
        let expected = if params.rare { 7 } else { 5 };
        assert_eq!(scene.voices.len(), expected, "seed {s}");
        let volume = if params.rare { -9.0 } else { -6.0 };
        assert!(scene.voices.iter().all(|v| v.volume_db == volume));
        seen_rare |= params.rare;
    }
    assert!(seen_rare, "no rare session in 400 seeds");
}

#[test]
fn voice_parameters_stay_in_range() {
    for s in 0..100 {
        let (_, scene) = make_scene(s);
        for voice in &scene.voices {
            assert!(voice.partials <= 31);
            assert!(voice.pan.rate_hz >= 0.0);
            assert!(voice.pan.rate_hz < voice.frequency * 0.005);
            assert_eq!(voice.pan.depth, 0.7);
        }
    }
}

#[test]
fn scene_levels_and_noise() {
    let (_, scene) = make_scene(3);
    assert_eq!(scene.input_volume_db, -8.0);
    assert_eq!(scene.noise, NoiseSource { volume_db: -15.0 });
    assert_eq!(scene.transport.bpm, 140.0);
}

#[test]
fn delay_of_one_beat_is_a_quarter_note_at_140_bpm() {
    let transport = Transport { bpm: 140.0 };
    assert!((transport.beats_to_seconds(1.0) - 60.0 / 140.0).abs() < 1e-12);
}

#[test]
fn decibels_convert_to_gain() {
    assert_eq!(db_to_gain(0.0), 1.0);
    assert!((db_to_gain(-6.0) - 0.501187).abs() < 1e-6);
    assert!((db_to_gain(20.0) - 10.0).abs() < 1e-12);
}

#[derive(Debug, PartialEq)]
enum Op {
    Create(String),
    Connect(usize, usize),
    Start(usize),
    Attack(usize),
    Transport,
}

#[derive(Default)]
struct RecordingGraph {
    names: Vec<String>,
    ops: Vec<Op>,
}

impl RecordingGraph {
    fn create(&mut self, name: &str) -> Result<usize, String> {
        self.names.push(name.to_string());
        self.ops.push(Op::Create(name.to_string()));
        Ok(self.names.len() - 1)
    }

    fn index_of(&self, name: &str) -> usize {
        self.names.iter().position(|n| n == name).unwrap()
    }
}

impl AudioGraph for RecordingGraph {
    type Node = usize;
    type Error = String;

    fn input(&mut self, _volume_db: f64) -> Result<usize, String> {
        self.create("input")
    }
    fn stage(&mut self, stage: &ChainStage, _transport: &Transport) -> Result<usize, String> {
        self.create(stage.name())
    }
    fn destination(&mut self) -> Result<usize, String> {
        self.create("destination")
    }
    fn noise(&mut self, _source: &NoiseSource) -> Result<usize, String> {
        self.create("noise")
    }
    fn oscillator(&mut self, voice: &ToneVoice) -> Result<usize, String> {
        self.create(&format!("osc-{}", voice.frequency))
    }
    fn auto_panner(&mut self, _pan: &AutoPan) -> Result<usize, String> {
        self.create("panner")
    }
    fn connect(&mut self, from: &usize, to: &usize) -> Result<(), String> {
        self.ops.push(Op::Connect(*from, *to));
        Ok(())
    }
    fn start(&mut self, node: &usize) -> Result<(), String> {
        self.ops.push(Op::Start(*node));
        Ok(())
    }
    fn trigger_attack(&mut self, envelope: &usize, _stage: &ChainStage) -> Result<(), String> {
        self.ops.push(Op::Attack(*envelope));
        Ok(())
    }
    fn start_transport(&mut self, _transport: &Transport) -> Result<(), String> {
        self.ops.push(Op::Transport);
        Ok(())
    }
}

#[test]
fn mount_wires_the_chain_input_to_destination() {
    let (_, scene) = make_scene(5);
    let mut graph = RecordingGraph::default();
    let mounted = scene.mount(&mut graph).unwrap();
    assert_eq!(mounted.stages.len(), 7);

    let path = [
        "input",
        "envelope",
        "feedback-delay",
        "low-shelf",
        "distortion",
        "lowpass",
        "reverb",
        "limiter",
        "destination",
    ];
    for pair in path.windows(2) {
        let edge = Op::Connect(graph.index_of(pair[0]), graph.index_of(pair[1]));
        assert!(graph.ops.contains(&edge), "missing {} -> {}", pair[0], pair[1]);
    }
}

#[test]
fn mount_feeds_every_source_into_the_input_and_starts_it() {
    let (_, scene) = make_scene(5);
    let mut graph = RecordingGraph::default();
    let mounted = scene.mount(&mut graph).unwrap();
    let input = mounted.input;

    assert!(graph.ops.contains(&Op::Connect(mounted.noise, input)));
    assert!(graph.ops.contains(&Op::Start(mounted.noise)));
    assert_eq!(mounted.voices.len(), scene.voices.len());
    for (osc, panner) in &mounted.voices {
        assert!(graph.ops.contains(&Op::Connect(*osc, *panner)));
        assert!(graph.ops.contains(&Op::Connect(*panner, input)));
        assert!(graph.ops.contains(&Op::Start(*osc)));
        assert!(graph.ops.contains(&Op::Start(*panner)));
    }
}

#[test]
fn mount_triggers_the_attack_once_then_starts_the_transport() {
    let (_, scene) = make_scene(9);
    let mut graph = RecordingGraph::default();
    let mounted = scene.mount(&mut graph).unwrap();
    let attacks: Vec<&Op> = graph
        .ops
        .iter()
        .filter(|op| matches!(op, Op::Attack(_)))
        .collect();
    assert_eq!(attacks, vec![&Op::Attack(mounted.stages[0])]);
    assert_eq!(graph.ops.last(), Some(&Op::Transport));
}

struct FailingGraph;

impl AudioGraph for FailingGraph {
    type Node = ();
    type Error = &'static str;

    fn input(&mut self, _: f64) -> Result<(), Self::Error> {
        Ok(())
    }
    fn stage(&mut self, stage: &ChainStage, _: &Transport) -> Result<(), Self::Error> {
        match stage {
            ChainStage::Reverb { .. } => Err("no convolver"),
            _ => Ok(()),
        }
    }
    fn destination(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
    fn noise(&mut self, _: &NoiseSource) -> Result<(), Self::Error> {
        Ok(())
    }
    fn oscillator(&mut self, _: &ToneVoice) -> Result<(), Self::Error> {
        Ok(())
    }
    fn auto_panner(&mut self, _: &AutoPan) -> Result<(), Self::Error> {
        Ok(())
    }
    fn connect(&mut self, _: &(), _: &()) -> Result<(), Self::Error> {
        Ok(())
    }
    fn start(&mut self, _: &()) -> Result<(), Self::Error> {
        Ok(())
    }
    fn trigger_attack(&mut self, _: &(), _: &ChainStage) -> Result<(), Self::Error> {
        Ok(())
    }
    fn start_transport(&mut self, _: &Transport) -> Result<(), Self::Error> {
        Ok(())
    }
}

#[test]
fn mount_propagates_backend_errors() {
    let (_, scene) = make_scene(1);
    assert_eq!(scene.mount(&mut FailingGraph).err(), Some("no convolver"));
}
