use std::collections::BTreeMap;
use std::fmt;
use std::io;
use std::marker::PhantomData;

use chrono::{DateTime, FixedOffset};

use super::{Category, Content, Entry, Link, Multiple, Person, Text};
use crate::codecs::Rfc3339;
use crate::parser::base::{DecodeError, DecodeResult, EncodeResult, XmlElement};
use crate::schema::{self, Codec, Coder, DocumentElement, FromElement, Item, Mergeable,
                    SchemaError, SchemaResult, ToElement};

/// The value of one field of an `Element`.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Str(String),
    Text(Text),
    Content(Content),
    Time(DateTime<FixedOffset>),
    People(Multiple<Person>),
    Categories(Multiple<Category>),
    Links(Multiple<Link>),
    Entries(Multiple<Entry>),
}

impl Value {
    /// Whether the value can be stored under a field coded by `coder`.
    pub fn fits(&self, coder: Coder) -> bool {
        matches!((self, coder),
                 (&Value::Str(_), Coder::Str) |
                 (&Value::Text(_), Coder::Text) |
                 (&Value::Content(_), Coder::Content) |
                 (&Value::Time(_), Coder::Time) |
                 (&Value::People(_), Coder::Multiple(Item::Person)) |
                 (&Value::Categories(_), Coder::Multiple(Item::Category)) |
                 (&Value::Links(_), Coder::Multiple(Item::Link)) |
                 (&Value::Entries(_), Coder::Multiple(Item::Entry)))
    }

    fn is_empty_collection(&self) -> bool {
        match *self {
            Value::People(ref m) => m.is_empty(),
            Value::Categories(ref m) => m.is_empty(),
            Value::Links(ref m) => m.is_empty(),
            Value::Entries(ref m) => m.is_empty(),
            _ => false,
        }
    }
}

/// Types that can be stored as a field `Value`.
pub trait FieldValue: Sized {
    fn into_value(self) -> Value;
    fn from_value(value: &Value) -> Option<&Self>;
    fn from_value_mut(value: &mut Value) -> Option<&mut Self>;
}

/// Collections, which can be created empty in place.
pub trait CollectionValue: FieldValue {
    /// Make `value` hold an empty collection of this type unless it already
    /// holds one, and borrow it.
    fn coerce(value: &mut Value) -> &mut Self;
}

impl_field_value!(String, Str);
impl_field_value!(Text, Text);
impl_field_value!(Content, Content);
impl_field_value!(DateTime<FixedOffset>, Time);
impl_field_value!(Person, People, multiple);
impl_field_value!(Category, Categories, multiple);
impl_field_value!(Link, Links, multiple);
impl_field_value!(Entry, Entries, multiple);

/// A document whose children are declared by the schema of `D`.
///
/// Fields that are absent from the document are absent from the element;
/// collection fields are never stored empty by the reader.
pub struct Element<D> {
    values: BTreeMap<&'static str, Value>,
    document: PhantomData<D>,
}

impl<D> Clone for Element<D> {
    fn clone(&self) -> Element<D> {
        Element { values: self.values.clone(), document: PhantomData }
    }
}

impl<D> PartialEq for Element<D> {
    /// An empty collection compares equal to an absent one.
    fn eq(&self, other: &Element<D>) -> bool {
        fn present<'a>(values: &'a BTreeMap<&'static str, Value>)
                   -> impl Iterator<Item=(&'a &'static str, &'a Value)> {
            values.iter().filter(|&(_, v)| !v.is_empty_collection())
        }
        present(&self.values).eq(present(&other.values))
    }
}

impl<D> fmt::Debug for Element<D> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_map().entries(self.values.iter()).finish()
    }
}

impl<D> Default for Element<D> {
    fn default() -> Element<D> {
        Element { values: BTreeMap::new(), document: PhantomData }
    }
}

impl<D: DocumentElement> Element<D> {
    pub fn new() -> Element<D> {
        Default::default()
    }

    pub fn schema() -> &'static [schema::Field] {
        D::schema()
    }

    pub fn is_set(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn value(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn get<T: FieldValue>(&self, name: &str) -> Option<&T> {
        self.values.get(name).and_then(T::from_value)
    }

    pub fn get_mut<T: FieldValue>(&mut self, name: &str) -> Option<&mut T> {
        self.values.get_mut(name).and_then(T::from_value_mut)
    }

    /// Store `value` under the field `name`, checking it against the schema.
    pub fn set<T: FieldValue>(&mut self, name: &str, value: T) -> SchemaResult<()> {
        let field = schema::field::<D>(name)
            .ok_or_else(|| SchemaError::UnknownField(name.to_owned()))?;
        let value = value.into_value();
        if !value.fits(field.coder) {
            return Err(SchemaError::TypeMismatch(field.name));
        }
        self.values.insert(field.name, value);
        Ok(())
    }

    pub fn unset(&mut self, name: &str) -> Option<Value> {
        self.values.remove(name)
    }

    /// The values of a collection field; empty when it is absent.
    pub fn collection<T>(&self, name: &str) -> &[T] where Multiple<T>: FieldValue {
        self.get::<Multiple<T>>(name).map(|m| &m[..]).unwrap_or(&[])
    }

    /// The collection field `name`, created empty when absent.
    pub fn collection_mut<T>(&mut self, name: &str) -> SchemaResult<&mut Multiple<T>>
        where Multiple<T>: CollectionValue
    {
        let field = schema::field::<D>(name)
            .ok_or_else(|| SchemaError::UnknownField(name.to_owned()))?;
        if !Multiple::<T>::new().into_value().fits(field.coder) {
            return Err(SchemaError::TypeMismatch(field.name));
        }
        Ok(self.collection_slot(field.name))
    }

    pub(crate) fn insert<T: FieldValue>(&mut self, name: &'static str, value: T) {
        self.values.insert(name, value.into_value());
    }

    pub(crate) fn collection_slot<T>(&mut self, name: &'static str) -> &mut Multiple<T>
        where Multiple<T>: CollectionValue
    {
        let slot = self.values.entry(name).or_insert_with(|| Multiple::<T>::new().into_value());
        Multiple::<T>::coerce(slot)
    }

    pub fn from_element(element: &XmlElement) -> DecodeResult<Element<D>> {
        Element::build_from(element)
    }

    /// Read a whole document whose root must be the element of `D`.
    pub fn parse<R: io::Read>(source: R) -> DecodeResult<Element<D>> {
        let root = XmlElement::parse(source)?;
        if !root.is(D::xmlns(), D::tag()) {
            return Err(DecodeError::UnexpectedRoot {
                expected: D::tag().to_owned(),
                found: root.name.local_name.clone(),
            });
        }
        Element::from_element(&root)
    }

    /// A root node for the document, declaring its namespace.
    pub fn to_element(&self) -> XmlElement {
        let mut root = XmlElement::qualified(D::xmlns(), D::tag());
        root.declare_namespace(None, D::xmlns());
        self.write_into(&mut root);
        root
    }

    pub fn to_xml_string(&self) -> EncodeResult<String> {
        self.to_element().to_xml_string()
    }

    /// A new document holding `incoming`'s fields over this one's.
    ///
    /// A field absent from `incoming`, or an empty collection in it, keeps
    /// this document's value.  Neither input is modified.
    pub fn merge(&self, incoming: &Element<D>) -> Element<D> {
        let mut merged = self.clone();
        merged.merge_with(incoming.clone());
        merged
    }
}

impl<D: DocumentElement> Mergeable for Element<D> {
    fn merge_with(&mut self, mut incoming: Element<D>) {
        for field in D::schema() {
            match incoming.values.remove(field.name) {
                Some(ref value) if value.is_empty_collection() => { }
                Some(value) => { self.values.insert(field.name, value); }
                None => { }
            }
        }
    }
}

fn collect<'a, T, I>(nodes: I) -> DecodeResult<Multiple<T>>
    where T: FromElement, I: Iterator<Item=&'a XmlElement>
{
    nodes.map(T::build_from).collect()
}

impl<D: DocumentElement> FromElement for Element<D> {
    fn read_from(&mut self, element: &XmlElement) -> DecodeResult<()> {
        for field in D::schema() {
            let mut nodes = element.children_named(D::xmlns(), field.tag);
            let value = match field.coder {
                Coder::Multiple(item) => {
                    let values = match item {
                        Item::Person => Value::People(collect(nodes)?),
                        Item::Category => Value::Categories(collect(nodes)?),
                        Item::Link => Value::Links(collect(nodes)?),
                        Item::Entry => Value::Entries(collect(nodes)?),
                    };
                    if values.is_empty_collection() { None } else { Some(values) }
                }
                coder => match nodes.next() {
                    None => None,
                    Some(node) => Some(match coder {
                        Coder::Text => Value::Text(Text::build_from(node)?),
                        Coder::Content => Value::Content(Content::build_from(node)?),
                        Coder::Time => Value::Time(Rfc3339.decode(&node.text())?),
                        _ => Value::Str(node.text()),
                    }),
                },
            };
            if let Some(value) = value {
                self.values.insert(field.name, value);
            }
        }
        Ok(())
    }
}

fn push_child<T: ToElement>(parent: &mut XmlElement, xmlns: &str, tag: &str, value: &T) {
    let mut child = XmlElement::qualified(xmlns, tag);
    value.write_into(&mut child);
    parent.push(child);
}

fn push_all<T: ToElement>(parent: &mut XmlElement, xmlns: &str, tag: &str, values: &[T]) {
    for value in values {
        push_child(parent, xmlns, tag, value);
    }
}

impl<D: DocumentElement> ToElement for Element<D> {
    fn write_into(&self, element: &mut XmlElement) {
        let xmlns = D::xmlns();
        for field in D::schema() {
            let value = match self.values.get(field.name) {
                Some(value) => value,
                None => continue,
            };
            match *value {
                Value::Str(ref s) => {
                    let mut child = XmlElement::qualified(xmlns, field.tag);
                    child.push_text(&s[..]);
                    element.push(child);
                }
                Value::Time(ref dt) => {
                    let mut child = XmlElement::qualified(xmlns, field.tag);
                    child.push_text(Rfc3339.to_text(dt));
                    element.push(child);
                }
                Value::Text(ref t) => push_child(element, xmlns, field.tag, t),
                Value::Content(ref c) => push_child(element, xmlns, field.tag, c),
                Value::People(ref m) => push_all(element, xmlns, field.tag, &m[..]),
                Value::Categories(ref m) => push_all(element, xmlns, field.tag, &m[..]),
                Value::Links(ref m) => push_all(element, xmlns, field.tag, &m[..]),
                Value::Entries(ref m) => push_all(element, xmlns, field.tag, &m[..]),
            }
        }
    }
}

impl<D: DocumentElement> fmt::Display for Element<D> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let xml = self.to_xml_string().map_err(|_| fmt::Error)?;
        f.write_str(&xml)
    }
}
