//! The single list of operation kinds and everything derived from it.
//!
//! [`op_registry!`] is invoked once with every `(kind, record type)` pair in canonical order.
//! It generates the [`OpKind`] enum, binds each record type's [`Tagged::KIND`], and builds the
//! static dispatch table the op buffer walks with. Adding an operation is one line in the
//! invocation plus its record type; the tag, the dispatch entry and the destructor entry can
//! not drift apart.

use crate::foundation::error::CanvasResult;
use crate::ops::codec::{Payload, PayloadReader};
use crate::ops::pool::{OwnedPool, PoolValue, Slot};
use crate::ops::records::*;
use crate::render::backend::CanvasRenderer;
use crate::resources::ResourceRegistry;

/// Binds a record type to its kind tag.
pub trait Tagged {
    /// Kind written into the record header.
    const KIND: OpKind;
}

/// A recordable canvas operation.
pub trait Record: Payload + Tagged {
    /// Heap data the record keeps in the [`OwnedPool`]; `()` for plain records.
    ///
    /// The registry gives a kind a destroy entry exactly when this type needs dropping.
    type Owned;

    /// Whether recording this op marks the buffer as containing text.
    const HAS_TEXT: bool = false;

    /// Make the one renderer call this op stands for.
    fn apply(&self, cx: &mut ApplyContext<'_>) -> CanvasResult<()>;

    /// Release the record's owned payloads.
    fn release(&self, pool: &mut OwnedPool) -> CanvasResult<()> {
        let _ = pool;
        Ok(())
    }
}

/// Everything an op needs during playback.
pub struct ApplyContext<'a> {
    renderer: &'a mut dyn CanvasRenderer,
    resources: &'a ResourceRegistry,
    pool: &'a OwnedPool,
}

impl<'a> ApplyContext<'a> {
    pub(crate) fn new(
        renderer: &'a mut dyn CanvasRenderer,
        resources: &'a ResourceRegistry,
        pool: &'a OwnedPool,
    ) -> Self {
        Self {
            renderer,
            resources,
            pool,
        }
    }

    /// Playback target.
    pub fn renderer(&mut self) -> &mut (dyn CanvasRenderer + 'a) {
        &mut *self.renderer
    }

    /// Shared resources for weak handles.
    pub fn resources(&self) -> &'a ResourceRegistry {
        self.resources
    }

    /// Owned payload behind `slot`. The borrow outlives `self`, so the renderer stays usable.
    pub fn owned<T: PoolValue>(&self, slot: &Slot<T>) -> CanvasResult<&'a T> {
        let pool: &'a OwnedPool = self.pool;
        pool.get(slot)
    }
}

pub(crate) type ApplyThunk = fn(&[u8], &mut ApplyContext<'_>) -> CanvasResult<()>;
pub(crate) type DestroyThunk = fn(&[u8], &mut OwnedPool) -> CanvasResult<()>;

/// Dispatch entry for one kind.
#[derive(Clone, Copy)]
pub(crate) struct OpEntry {
    pub(crate) kind: OpKind,
    pub(crate) apply: ApplyThunk,
    pub(crate) destroy: Option<DestroyThunk>,
}

impl OpEntry {
    const fn of<R: Record>() -> Self {
        Self {
            kind: R::KIND,
            apply: apply_thunk::<R>,
            destroy: if std::mem::needs_drop::<R::Owned>() {
                Some(destroy_thunk::<R>)
            } else {
                None
            },
        }
    }
}

fn apply_thunk<R: Record>(payload: &[u8], cx: &mut ApplyContext<'_>) -> CanvasResult<()> {
    R::decode(&mut PayloadReader::new(payload))?.apply(cx)
}

fn destroy_thunk<R: Record>(payload: &[u8], pool: &mut OwnedPool) -> CanvasResult<()> {
    R::decode(&mut PayloadReader::new(payload))?.release(pool)
}

macro_rules! op_registry {
    ($($kind:ident => $rec:ty,)+) => {
        /// Operation kind, stored in the low byte of every record header.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(u8)]
        pub enum OpKind {
            $(
                #[doc = concat!("Tag of [`", stringify!($rec), "`].")]
                $kind,
            )+
        }

        impl OpKind {
            /// Every kind in tag order.
            pub const ALL: &'static [OpKind] = &[$(OpKind::$kind,)+];

            /// Number of registered kinds.
            pub const COUNT: usize = Self::ALL.len();

            /// Header tag.
            pub const fn tag(self) -> u8 {
                self as u8
            }

            /// Kind for `tag`, `None` when no kind has that tag.
            pub fn from_tag(tag: u8) -> Option<Self> {
                Self::ALL.get(usize::from(tag)).copied()
            }

            /// Variant name, for diagnostics.
            pub const fn name(self) -> &'static str {
                match self {
                    $(OpKind::$kind => stringify!($kind),)+
                }
            }
        }

        $(
            impl Tagged for $rec {
                const KIND: OpKind = OpKind::$kind;
            }
        )+

        pub(crate) static REGISTRY: [OpEntry; OpKind::COUNT] = [$(OpEntry::of::<$rec>(),)+];
    };
}

op_registry! {
    Save => SaveOp,
    Restore => RestoreOp,
    SaveLayer => SaveLayerOp,
    RestoreLayer => RestoreLayerOp,
    Reset => ResetOp,
    Scale => ScaleOp,
    Rotate => RotateOp,
    Translate => TranslateOp,
    Transform => TransformOp,
    SetTransform => SetTransformOp,
    ResetTransform => ResetTransformOp,
    SetFillColor => SetFillColorOp,
    SetStrokeColor => SetStrokeColorOp,
    SetFillGradient => SetFillGradientOp,
    SetStrokeGradient => SetStrokeGradientOp,
    SetFillPattern => SetFillPatternOp,
    SetStrokePattern => SetStrokePatternOp,
    SetLineWidth => SetLineWidthOp,
    SetLineCap => SetLineCapOp,
    SetLineJoin => SetLineJoinOp,
    SetMiterLimit => SetMiterLimitOp,
    SetLineDash => SetLineDashOp,
    SetLineDashOffset => SetLineDashOffsetOp,
    SetGlobalAlpha => SetGlobalAlphaOp,
    SetCompositeOperation => SetCompositeOperationOp,
    SetShadowBlur => SetShadowBlurOp,
    SetShadowColor => SetShadowColorOp,
    SetShadowOffset => SetShadowOffsetOp,
    SetImageSmoothing => SetImageSmoothingOp,
    SetFilter => SetFilterOp,
    SetFont => SetFontOp,
    SetTextAlign => SetTextAlignOp,
    SetTextBaseline => SetTextBaselineOp,
    FillRect => FillRectOp,
    StrokeRect => StrokeRectOp,
    ClearRect => ClearRectOp,
    BeginPath => BeginPathOp,
    ClosePath => ClosePathOp,
    MoveTo => MoveToOp,
    LineTo => LineToOp,
    Arc => ArcOp,
    ArcTo => ArcToOp,
    Ellipse => EllipseOp,
    BezierCurveTo => BezierCurveToOp,
    QuadraticCurveTo => QuadraticCurveToOp,
    AddRect => AddRectOp,
    Fill => FillOp,
    Stroke => StrokeOp,
    Clip => ClipOp,
    FillPath2D => FillPath2DOp,
    StrokePath2D => StrokePath2DOp,
    ClipPath2D => ClipPath2DOp,
    FillText => FillTextOp,
    StrokeText => StrokeTextOp,
    DrawImage => DrawImageOp,
    PutImageData => PutImageDataOp,
}

const _: () = assert!(OpKind::COUNT <= 256);

impl OpKind {
    /// Dispatch entry for this kind.
    pub(crate) fn entry(self) -> &'static OpEntry {
        &REGISTRY[self as usize]
    }

    /// Whether records of this kind own pool payloads that must be released.
    pub fn has_destructor(self) -> bool {
        self.entry().destroy.is_some()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/ops/registry.rs"]
mod tests;
