//! Filter Buttons - A control bar driving a small gallery
//!
//! This demo wires everything together:
//! - Filter, sort and toggle buttons in an in-memory document
//! - A gallery mixer that completes commands after an "animation" tick
//! - Status reflected back onto the buttons
//!
//! Run with: RUST_LOG=debug cargo run --example filter_buttons

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use spark_controls::{
    Command, Control, ControlMethod, ControlRegistry, Document, ElementId, Mixer, MixerRef,
};
use tracing_subscriber::EnvFilter;

/// Mixer over a fixed list of items, each tagged with a class.
struct GalleryMixer {
    items: Vec<(&'static str, &'static str)>,
    controls: RefCell<Vec<Weak<Control>>>,
    current: RefCell<Command>,
    toggles: RefCell<Vec<String>>,
    queue: RefCell<Vec<Command>>,
}

impl GalleryMixer {
    fn new(items: Vec<(&'static str, &'static str)>) -> Rc<Self> {
        Rc::new(Self {
            items,
            controls: RefCell::new(Vec::new()),
            current: RefCell::new(Command::multi_mix("all", "default")),
            toggles: RefCell::new(Vec::new()),
            queue: RefCell::new(Vec::new()),
        })
    }

    fn bind(&self, control: &Rc<Control>, handle: &MixerRef) {
        control.add_binding(handle);
        self.controls.borrow_mut().push(Rc::downgrade(control));
    }

    fn show(&self, filter: &str) -> Vec<&'static str> {
        let wanted: Vec<&str> = filter
            .split(',')
            .map(|f| f.trim().trim_start_matches('.'))
            .collect();
        self.items
            .iter()
            .filter(|(_, class)| filter == "all" || wanted.contains(class))
            .map(|(name, _)| *name)
            .collect()
    }

    /// One animation frame: apply everything queued and report back.
    fn tick(&self) {
        let queued = std::mem::take(&mut *self.queue.borrow_mut());
        let toggles = self.toggles.borrow().clone();
        let controls: Vec<Rc<Control>> = self
            .controls
            .borrow()
            .iter()
            .filter_map(Weak::upgrade)
            .collect();

        for command in queued {
            let filter = command.filter.clone().unwrap_or_default();
            println!(
                "  gallery shows {:?} sorted by {}",
                self.show(&filter),
                command.sort.as_deref().unwrap_or("default")
            );
            for control in &controls {
                control.update(&command, &toggles);
            }
        }
    }

    fn push_toggles(&self) {
        let filter = {
            let toggles = self.toggles.borrow();
            if toggles.is_empty() {
                "all".to_string()
            } else {
                toggles.join(", ")
            }
        };
        let mut current = self.current.borrow_mut();
        current.filter = Some(filter);
        self.queue.borrow_mut().push(current.clone());
    }
}

impl Mixer for GalleryMixer {
    fn multi_mix(&self, command: &Command) {
        let mut current = self.current.borrow_mut();
        if let Some(ref filter) = command.filter {
            current.filter = Some(filter.clone());
            self.toggles.borrow_mut().clear();
        }
        if let Some(ref sort) = command.sort {
            current.sort = Some(sort.clone());
        }
        self.queue.borrow_mut().push(current.clone());
    }

    fn toggle_on(&self, filter: &str) {
        self.toggles.borrow_mut().push(filter.to_string());
        self.push_toggles();
    }

    fn toggle_off(&self, filter: &str) {
        self.toggles.borrow_mut().retain(|t| t != filter);
        self.push_toggles();
    }

    fn active_class(&self) -> String {
        "mixitup-control-active".to_string()
    }

    fn set_last_clicked(&self, _element: ElementId) {}
}

fn print_bar(doc: &Document, controls: &[(&str, ElementId, Rc<Control>)]) {
    for (label, el, control) in controls {
        println!(
            "  [{:<8}] status={:<8} classes={:?}",
            label,
            control.status().to_string(),
            doc.classes(*el)
        );
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let registry = ControlRegistry::new();
    let doc = Rc::new(Document::new());
    let bar = doc.create_element("nav", None);

    let gallery = GalleryMixer::new(vec![
        ("sunset", "red"),
        ("ocean", "blue"),
        ("rose", "red"),
        ("sky", "blue"),
        ("forest", "green"),
    ]);
    let handle: MixerRef = gallery.clone();

    let buttons: [(&str, ControlMethod, &[(&str, &str)]); 5] = [
        ("all", ControlMethod::Filter, &[("data-filter", "all")]),
        ("red", ControlMethod::Filter, &[("data-filter", ".red")]),
        ("by name", ControlMethod::Sort, &[("data-sort", "name:asc")]),
        ("+blue", ControlMethod::Toggle, &[("data-toggle", ".blue")]),
        ("+green", ControlMethod::Toggle, &[("data-toggle", ".green")]),
    ];

    let controls: Vec<(&str, ElementId, Rc<Control>)> = buttons
        .iter()
        .map(|(label, method, attrs)| {
            let el = doc.create_element_with("button", Some(bar), attrs);
            let control = Control::init(&registry, doc.clone(), el, *method, None);
            gallery.bind(&control, &handle);
            (*label, el, control)
        })
        .collect();

    for label in ["red", "by name", "+blue", "+green", "+blue", "all"] {
        let Some((_, el, _)) = controls.iter().find(|(l, _, _)| *l == label) else {
            continue;
        };
        println!("click {label}");
        doc.click(*el);
        gallery.tick();
        print_bar(&doc, &controls);
    }

    registry.teardown();
    println!("registry torn down, {} controls listening", registry.len());
}
