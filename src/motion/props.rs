//! Animatable visual properties.

/// One animatable channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Prop {
    X,
    Y,
    XPercent,
    YPercent,
    Opacity,
    Scale,
    Rotation,
}

impl Prop {
    pub const ALL: [Prop; 7] = [
        Prop::X,
        Prop::Y,
        Prop::XPercent,
        Prop::YPercent,
        Prop::Opacity,
        Prop::Scale,
        Prop::Rotation,
    ];
}

/// The resolved visual state of one target.  Defaults are the identity
/// transform: no offset, fully opaque, unscaled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Visual {
    /// Horizontal offset in columns.
    pub x: f64,
    /// Vertical offset in rows.
    pub y: f64,
    /// Horizontal offset as a percentage of the target's own width.
    pub x_percent: f64,
    /// Vertical offset as a percentage of the target's own height.
    pub y_percent: f64,
    pub opacity: f64,
    pub scale: f64,
    /// Degrees.
    pub rotation: f64,
}

impl Default for Visual {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            x_percent: 0.0,
            y_percent: 0.0,
            opacity: 1.0,
            scale: 1.0,
            rotation: 0.0,
        }
    }
}

impl Visual {
    pub fn get(&self, prop: Prop) -> f64 {
        match prop {
            Prop::X => self.x,
            Prop::Y => self.y,
            Prop::XPercent => self.x_percent,
            Prop::YPercent => self.y_percent,
            Prop::Opacity => self.opacity,
            Prop::Scale => self.scale,
            Prop::Rotation => self.rotation,
        }
    }

    pub fn set(&mut self, prop: Prop, value: f64) {
        match prop {
            Prop::X => self.x = value,
            Prop::Y => self.y = value,
            Prop::XPercent => self.x_percent = value,
            Prop::YPercent => self.y_percent = value,
            Prop::Opacity => self.opacity = value,
            Prop::Scale => self.scale = value,
            Prop::Rotation => self.rotation = value,
        }
    }

    /// Overwrite every channel that `props` specifies.
    pub fn apply(&mut self, props: &Props) {
        for prop in Prop::ALL {
            if let Some(v) = props.get(prop) {
                self.set(prop, v);
            }
        }
    }

    /// Total horizontal displacement for a target `width` columns wide.
    pub fn offset_x(&self, width: f64) -> f64 {
        self.x + self.x_percent / 100.0 * width
    }

    /// Total vertical displacement for a target `height` rows tall.
    pub fn offset_y(&self, height: f64) -> f64 {
        self.y + self.y_percent / 100.0 * height
    }
}

/// A partial set of channel values, used as tween endpoints.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Props {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub x_percent: Option<f64>,
    pub y_percent: Option<f64>,
    pub opacity: Option<f64>,
    pub scale: Option<f64>,
    pub rotation: Option<f64>,
}

impl Props {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn x(mut self, v: f64) -> Self {
        self.x = Some(v);
        self
    }

    pub fn y(mut self, v: f64) -> Self {
        self.y = Some(v);
        self
    }

    pub fn x_percent(mut self, v: f64) -> Self {
        self.x_percent = Some(v);
        self
    }

    pub fn y_percent(mut self, v: f64) -> Self {
        self.y_percent = Some(v);
        self
    }

    pub fn opacity(mut self, v: f64) -> Self {
        self.opacity = Some(v);
        self
    }

    pub fn scale(mut self, v: f64) -> Self {
        self.scale = Some(v);
        self
    }

    pub fn rotation(mut self, v: f64) -> Self {
        self.rotation = Some(v);
        self
    }

    pub fn get(&self, prop: Prop) -> Option<f64> {
        match prop {
            Prop::X => self.x,
            Prop::Y => self.y,
            Prop::XPercent => self.x_percent,
            Prop::YPercent => self.y_percent,
            Prop::Opacity => self.opacity,
            Prop::Scale => self.scale,
            Prop::Rotation => self.rotation,
        }
    }

    /// Channels present in this set.
    pub fn channels(&self) -> impl Iterator<Item = Prop> + '_ {
        Prop::ALL.into_iter().filter(|p| self.get(*p).is_some())
    }

    /// Fill any channel missing here with the identity value, so a `to`
    /// tween written as `from(...)` still knows where to land.
    pub fn with_identity_for(mut self, other: &Props) -> Self {
        let identity = Visual::default();
        for prop in other.channels() {
            if self.get(prop).is_none() {
                self.set(prop, identity.get(prop));
            }
        }
        self
    }

    fn set(&mut self, prop: Prop, v: f64) {
        let slot = match prop {
            Prop::X => &mut self.x,
            Prop::Y => &mut self.y,
            Prop::XPercent => &mut self.x_percent,
            Prop::YPercent => &mut self.y_percent,
            Prop::Opacity => &mut self.opacity,
            Prop::Scale => &mut self.scale,
            Prop::Rotation => &mut self.rotation,
        };
        *slot = Some(v);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_touches_only_specified_channels() {
        let mut v = Visual::default();
        v.apply(&Props::new().opacity(0.5).y(3.0));
        assert_eq!(v.opacity, 0.5);
        assert_eq!(v.y, 3.0);
        assert_eq!(v.scale, 1.0);
    }

    #[test]
    fn percent_offsets_scale_with_size() {
        let v = Visual {
            y_percent: 20.0,
            y: 1.0,
            ..Visual::default()
        };
        assert_eq!(v.offset_y(50.0), 11.0);
    }

    #[test]
    fn identity_fill() {
        let from = Props::new().opacity(0.0).scale(1.1);
        let to = Props::new().with_identity_for(&from);
        assert_eq!(to.opacity, Some(1.0));
        assert_eq!(to.scale, Some(1.0));
        assert_eq!(to.x, None);
    }
}
