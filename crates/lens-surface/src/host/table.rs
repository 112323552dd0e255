//! Surface bookkeeping owned by the host thread.

use std::collections::{BTreeMap, HashSet};

use lens_common::{Position, Rect, Size, SurfaceError, SurfaceHandle};
use serde::{Deserialize, Serialize};

/// Surface bounds snapped to whole device pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    /// Snap `rect` to pixels. Non-finite coordinates and sizes that round
    /// below one pixel are rejected.
    pub fn snap(rect: Rect) -> Result<Self, SurfaceError> {
        let (x, y) = snap_position(rect.position()).ok_or(SurfaceError::InvalidGeometry(rect))?;
        let (width, height) = snap_size(rect.size()).ok_or(SurfaceError::InvalidGeometry(rect))?;
        Ok(Self {
            x,
            y,
            width,
            height,
        })
    }
}

fn snap_position(position: Position) -> Option<(i32, i32)> {
    if !position.is_finite() {
        return None;
    }
    Some((position.x.round() as i32, position.y.round() as i32))
}

fn snap_size(size: Size) -> Option<(u32, u32)> {
    if !size.has_area() {
        return None;
    }
    let (width, height) = (size.width.round(), size.height.round());
    if width < 1.0 || height < 1.0 {
        return None;
    }
    Some((width as u32, height as u32))
}

/// A live surface as the host sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurfaceRecord {
    pub owner: String,
    pub bounds: PixelRect,
    pub background_color: u32,
}

/// Windows that may own surfaces and the surfaces they currently own.
#[derive(Debug)]
pub struct SurfaceTable {
    windows: HashSet<String>,
    surfaces: BTreeMap<u32, SurfaceRecord>,
    next_id: Option<u32>,
}

impl SurfaceTable {
    pub fn new() -> Self {
        Self {
            windows: HashSet::new(),
            surfaces: BTreeMap::new(),
            next_id: Some(1),
        }
    }

    /// Returns `false` if the window was already registered.
    pub fn register_window(&mut self, label: &str) -> bool {
        self.windows.insert(label.to_string())
    }

    /// Forget a window and every surface it owned. Returns how many
    /// surfaces went with it.
    pub fn unregister_window(&mut self, label: &str) -> usize {
        if !self.windows.remove(label) {
            return 0;
        }
        let before = self.surfaces.len();
        self.surfaces.retain(|_, s| s.owner != label);
        before - self.surfaces.len()
    }

    pub fn create(
        &mut self,
        owner: &str,
        rect: Rect,
        background_color: u32,
    ) -> Result<SurfaceHandle, SurfaceError> {
        if !self.windows.contains(owner) {
            return Err(SurfaceError::BackendUnavailable(format!(
                "window not found: {owner}"
            )));
        }
        let bounds = PixelRect::snap(rect)?;
        let id = self
            .next_id
            .ok_or_else(|| SurfaceError::BackendUnavailable("surface ids exhausted".into()))?;
        self.next_id = id.checked_add(1);

        self.surfaces.insert(
            id,
            SurfaceRecord {
                owner: owner.to_string(),
                bounds,
                background_color,
            },
        );
        Ok(SurfaceHandle(id))
    }

    pub fn set_size(&mut self, handle: SurfaceHandle, size: Size) -> Result<(), SurfaceError> {
        let record = self.record_mut(handle)?;
        let (width, height) = snap_size(size).ok_or_else(|| {
            SurfaceError::InvalidGeometry(Rect::new(
                f64::from(record.bounds.x),
                f64::from(record.bounds.y),
                size.width,
                size.height,
            ))
        })?;
        record.bounds.width = width;
        record.bounds.height = height;
        Ok(())
    }

    pub fn set_position(
        &mut self,
        handle: SurfaceHandle,
        position: Position,
    ) -> Result<(), SurfaceError> {
        let record = self.record_mut(handle)?;
        let (x, y) = snap_position(position).ok_or_else(|| {
            SurfaceError::InvalidGeometry(Rect::new(
                position.x,
                position.y,
                f64::from(record.bounds.width),
                f64::from(record.bounds.height),
            ))
        })?;
        record.bounds.x = x;
        record.bounds.y = y;
        Ok(())
    }

    pub fn destroy(&mut self, handle: SurfaceHandle) -> Result<(), SurfaceError> {
        self.surfaces
            .remove(&handle.0)
            .map(|_| ())
            .ok_or(SurfaceError::UnknownHandle(handle))
    }

    pub fn get(&self, handle: SurfaceHandle) -> Option<&SurfaceRecord> {
        self.surfaces.get(&handle.0)
    }

    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }

    fn record_mut(&mut self, handle: SurfaceHandle) -> Result<&mut SurfaceRecord, SurfaceError> {
        self.surfaces
            .get_mut(&handle.0)
            .ok_or(SurfaceError::UnknownHandle(handle))
    }

    #[cfg(test)]
    pub(crate) fn with_next_id(next_id: u32) -> Self {
        Self {
            next_id: Some(next_id),
            ..Self::new()
        }
    }
}

impl Default for SurfaceTable {
    fn default() -> Self {
        Self::new()
    }
}
