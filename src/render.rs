//! Outbound vocabulary for the bar.
//!
//! The bar is driven through three operations on named elements:
//! [`RenderCommand::Add`], [`RenderCommand::Set`] and
//! [`RenderCommand::Remove`].  Element properties are a closed set of typed
//! [`Attr`]s, and each [`ElementKind`] only accepts the attributes that make
//! sense for it; [`RenderCommand::add`] and [`RenderCommand::set`] reject
//! anything else.
//!
//! [`Layout`] builds the fixed element tree of one slot: a container bound
//! to its display plus one label per tag.

use crate::event::DisplayId;
use crate::palette::Color;
use crate::slots::Slot;
use std::fmt;

/// The two element kinds this bridge creates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    /// A row that groups its children and owns background/shadow styling.
    Container,
    /// A text label.
    Item,
}

impl ElementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementKind::Container => "container",
            ElementKind::Item => "item",
        }
    }

    /// Whether an element of this kind accepts `attr`.
    pub fn accepts(&self, attr: &Attr) -> bool {
        match self {
            ElementKind::Container => matches!(
                attr,
                Attr::BackgroundColor(_)
                    | Attr::CornerRadius(_)
                    | Attr::ShadowColor(_)
                    | Attr::ShadowRadius(_)
                    | Attr::PaddingLeft(_)
                    | Attr::PaddingRight(_)
                    | Attr::Gap(_)
                    | Attr::Height(_)
                    | Attr::NotchAlign(_)
                    | Attr::Display(_)
            ),
            ElementKind::Item => matches!(
                attr,
                Attr::Label(_)
                    | Attr::LabelColor(_)
                    | Attr::BackgroundColor(_)
                    | Attr::BorderColor(_)
                    | Attr::BorderWidth(_)
                    | Attr::FontFamily(_)
                    | Attr::FontWeight(_)
                    | Attr::FontSize(_)
                    | Attr::PaddingLeft(_)
                    | Attr::PaddingRight(_)
                    | Attr::CornerRadius(_)
                    | Attr::Height(_)
                    | Attr::Position(_)
                    | Attr::OnClick(_)
            ),
        }
    }
}

/// A color value that can also be reset to the bar's default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Paint {
    Color(Color),
    /// Sent as an empty string: "clear to default".
    Clear,
}

impl fmt::Display for Paint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Paint::Color(c) => write!(f, "{}", c),
            Paint::Clear => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontWeight {
    Regular,
    Medium,
    Bold,
}

impl FontWeight {
    pub fn as_str(&self) -> &'static str {
        match self {
            FontWeight::Regular => "regular",
            FontWeight::Medium => "medium",
            FontWeight::Bold => "bold",
        }
    }
}

/// Which side of the notch a container hugs on displays that have one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotchAlign {
    Left,
    Right,
}

impl NotchAlign {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotchAlign::Left => "left",
            NotchAlign::Right => "right",
        }
    }
}

/// A single typed element property.
#[derive(Debug, Clone, PartialEq)]
pub enum Attr {
    Label(String),
    LabelColor(Paint),
    BackgroundColor(Paint),
    BorderColor(Paint),
    BorderWidth(u16),
    ShadowColor(Color),
    ShadowRadius(u16),
    FontFamily(String),
    FontWeight(FontWeight),
    FontSize(u16),
    PaddingLeft(u16),
    PaddingRight(u16),
    CornerRadius(u16),
    Gap(u16),
    Height(u16),
    NotchAlign(NotchAlign),
    /// Sort position among siblings.
    Position(u32),
    /// Display the element is pinned to.
    Display(DisplayId),
    /// Shell command run when the element is clicked.
    OnClick(String),
}

impl Attr {
    /// Property name as the bar spells it (snake case).
    pub fn key(&self) -> &'static str {
        match self {
            Attr::Label(_) => "label",
            Attr::LabelColor(_) => "label_color",
            Attr::BackgroundColor(_) => "background_color",
            Attr::BorderColor(_) => "border_color",
            Attr::BorderWidth(_) => "border_width",
            Attr::ShadowColor(_) => "shadow_color",
            Attr::ShadowRadius(_) => "shadow_radius",
            Attr::FontFamily(_) => "font_family",
            Attr::FontWeight(_) => "font_weight",
            Attr::FontSize(_) => "font_size",
            Attr::PaddingLeft(_) => "padding_left",
            Attr::PaddingRight(_) => "padding_right",
            Attr::CornerRadius(_) => "corner_radius",
            Attr::Gap(_) => "gap",
            Attr::Height(_) => "height",
            Attr::NotchAlign(_) => "notch_align",
            Attr::Position(_) => "position",
            Attr::Display(_) => "display",
            Attr::OnClick(_) => "click_script",
        }
    }

    /// Property value as a string.  An empty string clears the property.
    pub fn value(&self) -> String {
        match self {
            Attr::Label(s) | Attr::FontFamily(s) | Attr::OnClick(s) => s.clone(),
            Attr::LabelColor(p) | Attr::BackgroundColor(p) | Attr::BorderColor(p) => p.to_string(),
            Attr::ShadowColor(c) => c.to_string(),
            Attr::BorderWidth(n)
            | Attr::ShadowRadius(n)
            | Attr::FontSize(n)
            | Attr::PaddingLeft(n)
            | Attr::PaddingRight(n)
            | Attr::CornerRadius(n)
            | Attr::Gap(n)
            | Attr::Height(n) => n.to_string(),
            Attr::FontWeight(w) => w.as_str().to_string(),
            Attr::NotchAlign(a) => a.as_str().to_string(),
            Attr::Position(p) => p.to_string(),
            Attr::Display(d) => d.to_string(),
        }
    }
}

/// Error building a [`RenderCommand`].
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum RenderError {
    #[error("{kind} element {name:?} does not accept {attr}")]
    UnsupportedAttr {
        name: String,
        kind: &'static str,
        attr: &'static str,
    },
}

/// One operation on the bar.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCommand {
    Add {
        name: String,
        kind: ElementKind,
        parent: Option<String>,
        attrs: Vec<Attr>,
    },
    Set {
        name: String,
        kind: ElementKind,
        attrs: Vec<Attr>,
    },
    Remove {
        name: String,
    },
}

fn check_attrs(name: &str, kind: ElementKind, attrs: &[Attr]) -> Result<(), RenderError> {
    match attrs.iter().find(|a| !kind.accepts(a)) {
        Some(bad) => Err(RenderError::UnsupportedAttr {
            name: name.to_string(),
            kind: kind.as_str(),
            attr: bad.key(),
        }),
        None => Ok(()),
    }
}

impl RenderCommand {
    /// Create an element.  Fails if `kind` does not accept one of `attrs`.
    pub fn add(
        name: impl Into<String>,
        kind: ElementKind,
        parent: Option<String>,
        attrs: Vec<Attr>,
    ) -> Result<Self, RenderError> {
        let name = name.into();
        check_attrs(&name, kind, &attrs)?;
        Ok(RenderCommand::Add {
            name,
            kind,
            parent,
            attrs,
        })
    }

    /// Update properties of an existing element of the given kind.
    pub fn set(
        name: impl Into<String>,
        kind: ElementKind,
        attrs: Vec<Attr>,
    ) -> Result<Self, RenderError> {
        let name = name.into();
        check_attrs(&name, kind, &attrs)?;
        Ok(RenderCommand::Set { name, kind, attrs })
    }

    pub fn remove(name: impl Into<String>) -> Self {
        RenderCommand::Remove { name: name.into() }
    }

    /// Name of the element this command targets.
    pub fn name(&self) -> &str {
        match self {
            RenderCommand::Add { name, .. }
            | RenderCommand::Set { name, .. }
            | RenderCommand::Remove { name } => name,
        }
    }
}

//  Element naming

/// Name of the container element for `slot`.
pub fn container_name(slot: Slot) -> String {
    format!("ws.d{}", slot)
}

/// Name of the label for `tag` (1-based) inside `slot`.
pub fn tag_name(slot: Slot, tag: u8) -> String {
    format!("space.d{}.{}", slot, tag)
}

//  Layout

/// Static styling of the per-slot element tree.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutStyle {
    pub num_tags: u8,
    pub font_family: String,
    pub font_size: u16,
    /// Click command template; `{tag}` and `{display}` are substituted.
    pub tag_click: Option<String>,
    /// Label color a tag starts with before the first update.
    pub initial_label: Color,
}

/// Builder for the element tree of one slot.
///
/// Sibling positions come from an explicit counter owned by the builder,
/// so the tree is laid out the same way every time it is built.
pub struct Layout<'a> {
    style: &'a LayoutStyle,
    next_position: u32,
}

impl<'a> Layout<'a> {
    pub fn new(style: &'a LayoutStyle) -> Self {
        Self {
            style,
            next_position: 1,
        }
    }

    fn next_position(&mut self) -> u32 {
        let p = self.next_position;
        self.next_position += 1;
        p
    }

    /// Every `add` needed to create `slot` on `display`: the container
    /// first, then one label per tag in tag order.
    pub fn build(mut self, slot: Slot, display: &DisplayId) -> Result<Vec<RenderCommand>, RenderError> {
        let style = self.style;
        let container = container_name(slot);
        let mut commands = Vec::with_capacity(style.num_tags as usize + 1);

        commands.push(RenderCommand::add(
            container.clone(),
            ElementKind::Container,
            None,
            vec![
                Attr::BackgroundColor(Paint::Color(Color::grey(0).with_alpha(0x80))),
                Attr::CornerRadius(8),
                Attr::ShadowColor(Color::grey(0)),
                Attr::ShadowRadius(10),
                Attr::PaddingLeft(6),
                Attr::PaddingRight(6),
                Attr::Gap(3),
                Attr::Height(22),
                Attr::NotchAlign(NotchAlign::Right),
                Attr::Display(display.clone()),
            ],
        )?);

        for tag in 1..=style.num_tags {
            let mut attrs = vec![
                Attr::Label(tag.to_string()),
                Attr::LabelColor(Paint::Color(style.initial_label)),
                Attr::FontFamily(style.font_family.clone()),
                Attr::FontWeight(FontWeight::Bold),
                Attr::FontSize(style.font_size),
                Attr::PaddingLeft(2),
                Attr::PaddingRight(2),
                Attr::CornerRadius(3),
                Attr::Height(18),
                Attr::Position(self.next_position()),
            ];
            if let Some(template) = &style.tag_click {
                let script = template
                    .replace("{tag}", &tag.to_string())
                    .replace("{display}", display.as_str());
                attrs.push(Attr::OnClick(script));
            }
            commands.push(RenderCommand::add(
                tag_name(slot, tag),
                ElementKind::Item,
                Some(container.clone()),
                attrs,
            )?);
        }

        Ok(commands)
    }
}

/// Every `remove` needed to tear `slot` down: children first, then the
/// container.
pub fn teardown(slot: Slot, num_tags: u8) -> Vec<RenderCommand> {
    (1..=num_tags)
        .map(|tag| RenderCommand::remove(tag_name(slot, tag)))
        .chain(std::iter::once(RenderCommand::remove(container_name(slot))))
        .collect()
}
