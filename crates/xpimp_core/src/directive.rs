//! Typed OBJ directives.
//!
//! The tokenizer upstream of the builder hands over `(name, args)` pairs
//! whose arguments are already type-coerced. [`Directive::from_parts`] maps
//! such a pair onto a [`Directive`], checking arity and argument kinds; no
//! text parsing happens here.

use xpimp_math::Vec3;

use crate::builder::{ImportError, ImportResult};
use crate::vt_table::VertexRecord;

/// One already-tokenized directive argument.
#[derive(Clone, Debug, PartialEq)]
pub enum DirectiveArg {
    Int(i64),
    Float(f32),
    Str(String),
    Vector(Vec3),
}

impl From<i64> for DirectiveArg {
    fn from(v: i64) -> Self {
        DirectiveArg::Int(v)
    }
}

impl From<i32> for DirectiveArg {
    fn from(v: i32) -> Self {
        DirectiveArg::Int(i64::from(v))
    }
}

impl From<u32> for DirectiveArg {
    fn from(v: u32) -> Self {
        DirectiveArg::Int(i64::from(v))
    }
}

impl From<f32> for DirectiveArg {
    fn from(v: f32) -> Self {
        DirectiveArg::Float(v)
    }
}

impl From<&str> for DirectiveArg {
    fn from(v: &str) -> Self {
        DirectiveArg::Str(v.to_string())
    }
}

impl From<String> for DirectiveArg {
    fn from(v: String) -> Self {
        DirectiveArg::Str(v)
    }
}

impl From<Vec3> for DirectiveArg {
    fn from(v: Vec3) -> Self {
        DirectiveArg::Vector(v)
    }
}

/// A directive the command builder understands.
#[derive(Clone, Debug, PartialEq)]
pub enum Directive {
    /// `VT x y z nx ny nz s t`
    Vt(VertexRecord),
    /// `IDX i`
    Idx(u32),
    /// `IDX10 i0..i9`
    Idx10([u32; 10]),
    /// `TRIS start count`, with an optional mesh name
    Tris {
        start: usize,
        count: usize,
        name: Option<String>,
    },
    AnimBegin,
    AnimEnd,
    AnimTransBegin {
        path: String,
    },
    AnimTransKey {
        value: f32,
        location: Vec3,
    },
    AnimTransEnd,
    AnimShow {
        v1: f32,
        v2: f32,
        path: String,
    },
    AnimHide {
        v1: f32,
        v2: f32,
        path: String,
    },
    AnimRotateBegin {
        axis: Vec3,
        path: String,
    },
    AnimRotateKey {
        value: f32,
        degrees: f32,
    },
    AnimRotateEnd,
    AnimKeyframeLoop {
        period: f32,
    },
    /// Static two-key translation
    AnimTrans {
        from: Vec3,
        to: Vec3,
        v1: f32,
        v2: f32,
        path: String,
    },
    /// Static two-key rotation
    AnimRotate {
        axis: Vec3,
        r1: f32,
        r2: f32,
        v1: f32,
        v2: f32,
        path: String,
    },
}

impl Directive {
    /// The directive's name as it appears in an OBJ file.
    pub fn name(&self) -> &'static str {
        match self {
            Directive::Vt(_) => "VT",
            Directive::Idx(_) => "IDX",
            Directive::Idx10(_) => "IDX10",
            Directive::Tris { .. } => "TRIS",
            Directive::AnimBegin => "ANIM_begin",
            Directive::AnimEnd => "ANIM_end",
            Directive::AnimTransBegin { .. } => "ANIM_trans_begin",
            Directive::AnimTransKey { .. } => "ANIM_trans_key",
            Directive::AnimTransEnd => "ANIM_trans_end",
            Directive::AnimShow { .. } => "ANIM_show",
            Directive::AnimHide { .. } => "ANIM_hide",
            Directive::AnimRotateBegin { .. } => "ANIM_rotate_begin",
            Directive::AnimRotateKey { .. } => "ANIM_rotate_key",
            Directive::AnimRotateEnd => "ANIM_rotate_end",
            Directive::AnimKeyframeLoop { .. } => "ANIM_keyframe_loop",
            Directive::AnimTrans { .. } => "ANIM_trans",
            Directive::AnimRotate { .. } => "ANIM_rotate",
        }
    }

    /// Build a directive from its name and coerced arguments.
    ///
    /// Vector arguments may be given as one [`DirectiveArg::Vector`] or as
    /// three consecutive numbers. Integers are accepted where floats are
    /// expected.
    pub fn from_parts(name: &str, args: &[DirectiveArg]) -> ImportResult<Self> {
        let mut a = Args::new(name, args);

        let directive = match name {
            "VT" => {
                let mut v = [0.0; 8];
                for slot in v.iter_mut() {
                    *slot = a.float("vertex component")?;
                }
                Directive::Vt(VertexRecord::from_array(v))
            }
            "IDX" => Directive::Idx(a.index()?),
            "IDX10" => {
                let mut idx = [0; 10];
                for slot in idx.iter_mut() {
                    *slot = a.index()?;
                }
                Directive::Idx10(idx)
            }
            "TRIS" => Directive::Tris {
                start: a.count("start")?,
                count: a.count("count")?,
                name: a.optional_string()?,
            },
            "ANIM_begin" => Directive::AnimBegin,
            "ANIM_end" => Directive::AnimEnd,
            "ANIM_trans_begin" => Directive::AnimTransBegin {
                path: a.string("dataref path")?,
            },
            "ANIM_trans_key" => Directive::AnimTransKey {
                value: a.float("value")?,
                location: a.vector("location")?,
            },
            "ANIM_trans_end" => Directive::AnimTransEnd,
            "ANIM_show" | "ANIM_hide" => {
                let v1 = a.float("v1")?;
                let v2 = a.float("v2")?;
                let path = a.string("dataref path")?;
                if name == "ANIM_show" {
                    Directive::AnimShow { v1, v2, path }
                } else {
                    Directive::AnimHide { v1, v2, path }
                }
            }
            "ANIM_rotate_begin" => Directive::AnimRotateBegin {
                axis: a.vector("axis")?,
                path: a.string("dataref path")?,
            },
            "ANIM_rotate_key" => Directive::AnimRotateKey {
                value: a.float("value")?,
                degrees: a.float("degrees")?,
            },
            "ANIM_rotate_end" => Directive::AnimRotateEnd,
            "ANIM_keyframe_loop" => Directive::AnimKeyframeLoop {
                period: a.float("loop")?,
            },
            "ANIM_trans" => Directive::AnimTrans {
                from: a.vector("xyz1")?,
                to: a.vector("xyz2")?,
                v1: a.float("v1")?,
                v2: a.float("v2")?,
                path: a.string("dataref path")?,
            },
            "ANIM_rotate" => Directive::AnimRotate {
                axis: a.vector("axis")?,
                r1: a.float("r1")?,
                r2: a.float("r2")?,
                v1: a.float("v1")?,
                v2: a.float("v2")?,
                path: a.string("dataref path")?,
            },
            other => return Err(ImportError::UnsupportedDirective(other.to_string())),
        };

        a.finish()?;
        Ok(directive)
    }
}

/// Cursor over one directive's arguments.
struct Args<'a> {
    directive: &'a str,
    args: &'a [DirectiveArg],
    pos: usize,
}

impl<'a> Args<'a> {
    fn new(directive: &'a str, args: &'a [DirectiveArg]) -> Self {
        Self {
            directive,
            args,
            pos: 0,
        }
    }

    fn invalid(&self, message: String) -> ImportError {
        ImportError::InvalidArguments {
            directive: self.directive.to_string(),
            message,
        }
    }

    fn next(&mut self, what: &str) -> ImportResult<&'a DirectiveArg> {
        let args = self.args;
        let arg = args
            .get(self.pos)
            .ok_or_else(|| self.invalid(format!("missing {} (argument {})", what, self.pos + 1)))?;
        self.pos += 1;
        Ok(arg)
    }

    fn float(&mut self, what: &str) -> ImportResult<f32> {
        match self.next(what)? {
            DirectiveArg::Float(f) => Ok(*f),
            DirectiveArg::Int(i) => Ok(*i as f32),
            other => Err(self.invalid(format!("{} must be a number, got {:?}", what, other))),
        }
    }

    fn int(&mut self, what: &str) -> ImportResult<i64> {
        match self.next(what)? {
            DirectiveArg::Int(i) => Ok(*i),
            other => Err(self.invalid(format!("{} must be an integer, got {:?}", what, other))),
        }
    }

    fn index(&mut self) -> ImportResult<u32> {
        let i = self.int("index")?;
        u32::try_from(i).map_err(|_| self.invalid(format!("index {} out of range", i)))
    }

    fn count(&mut self, what: &str) -> ImportResult<usize> {
        let i = self.int(what)?;
        usize::try_from(i).map_err(|_| self.invalid(format!("{} {} is negative", what, i)))
    }

    fn string(&mut self, what: &str) -> ImportResult<String> {
        match self.next(what)? {
            DirectiveArg::Str(s) => Ok(s.clone()),
            other => Err(self.invalid(format!("{} must be a string, got {:?}", what, other))),
        }
    }

    fn optional_string(&mut self) -> ImportResult<Option<String>> {
        if self.pos < self.args.len() {
            self.string("name").map(Some)
        } else {
            Ok(None)
        }
    }

    fn vector(&mut self, what: &str) -> ImportResult<Vec3> {
        if let Some(DirectiveArg::Vector(v)) = self.args.get(self.pos) {
            self.pos += 1;
            return Ok(*v);
        }
        Ok(Vec3::new(self.float(what)?, self.float(what)?, self.float(what)?))
    }

    fn finish(self) -> ImportResult<()> {
        if self.pos < self.args.len() {
            return Err(self.invalid(format!(
                "expected {} arguments, got {}",
                self.pos,
                self.args.len()
            )));
        }
        Ok(())
    }
}
