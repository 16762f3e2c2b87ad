use crate::engine::{Engine, TimelineHandle};
use crate::foundation::error::ScrollyteResult;
use crate::timeline::builder::TimelineSpec;

/// One page section owning its triggers and timelines.
///
/// Sections register everything they need on mount and destroy it on
/// unmount; the engine imposes no ordering between sections beyond the
/// trigger registry's creation-order tie-break.
pub trait SectionAdapter {
    /// Section name, for logs.
    fn name(&self) -> &str;

    /// Register triggers, timelines, and targets with the engine.
    fn mount(&mut self, engine: &mut Engine) -> ScrollyteResult<()>;

    /// Destroy everything registered in [`mount`](SectionAdapter::mount).
    fn unmount(&mut self, engine: &mut Engine) -> ScrollyteResult<()>;
}

/// Fixed ordered list of sections, mounted front to back and unmounted in
/// reverse.
#[derive(Default)]
pub struct Sequencer {
    sections: Vec<Box<dyn SectionAdapter>>,
    mounted: bool,
}

impl Sequencer {
    /// Empty sequencer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a section; order here is registration order at mount.
    pub fn push(&mut self, section: Box<dyn SectionAdapter>) {
        self.sections.push(section);
    }

    /// Number of sections.
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Whether no sections were added.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Whether every section is currently mounted.
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Mount every section in order. Fails fast on the first error.
    pub fn mount_all(&mut self, engine: &mut Engine) -> ScrollyteResult<()> {
        for section in &mut self.sections {
            tracing::debug!(section = section.name(), "mounting");
            section.mount(engine)?;
        }
        self.mounted = true;
        Ok(())
    }

    /// Unmount every section in reverse order.
    pub fn unmount_all(&mut self, engine: &mut Engine) -> ScrollyteResult<()> {
        for section in self.sections.iter_mut().rev() {
            tracing::debug!(section = section.name(), "unmounting");
            section.unmount(engine)?;
        }
        self.mounted = false;
        Ok(())
    }
}

/// Schedule and immediately start the preloader: a one-shot, time-driven
/// timeline with no trigger. Gate the rest of the page on
/// [`Engine::is_complete`].
pub fn start_preloader(
    engine: &mut Engine,
    spec: TimelineSpec,
) -> ScrollyteResult<TimelineHandle> {
    let handle = engine.add_timeline(spec)?;
    engine.play(&handle, None)?;
    Ok(handle)
}
