/// Typed accessors for the single-valued fields of a document type.
///
/// Each line `name, name_mut, set_name: Type;` expands into a getter, a
/// mutable getter and a setter that accepts anything convertible into
/// `Type`.  The field name is the identifier of the getter.
macro_rules! scalar_fields {
    ($($name:ident, $name_mut:ident, $set:ident: $t:ty;)+) => {
        $(
            pub fn $name(&self) -> Option<&$t> {
                self.get(stringify!($name))
            }

            pub fn $name_mut(&mut self) -> Option<&mut $t> {
                self.get_mut(stringify!($name))
            }

            pub fn $set<V: Into<$t>>(&mut self, value: V) {
                let value: $t = value.into();
                self.insert(stringify!($name), value)
            }
        )+
    }
}

/// Typed accessors for the collection fields of a document type.
///
/// The getter never fails; an absent collection reads as an empty slice.
/// The mutable getter creates the collection on first use.
macro_rules! multiple_fields {
    ($($name:ident, $name_mut:ident: $t:ty;)+) => {
        $(
            pub fn $name(&self) -> &[$t] {
                self.collection(stringify!($name))
            }

            pub fn $name_mut(&mut self) -> &mut $crate::feed::Multiple<$t> {
                self.collection_slot(stringify!($name))
            }
        )+
    }
}

/// Ties a value type to its variant of `feed::Value`.
macro_rules! impl_field_value {
    ($t:ty, $variant:ident) => {
        impl $crate::feed::FieldValue for $t {
            fn into_value(self) -> $crate::feed::Value {
                $crate::feed::Value::$variant(self)
            }

            fn from_value(value: &$crate::feed::Value) -> Option<&$t> {
                match *value {
                    $crate::feed::Value::$variant(ref v) => Some(v),
                    _ => None,
                }
            }

            fn from_value_mut(value: &mut $crate::feed::Value) -> Option<&mut $t> {
                match *value {
                    $crate::feed::Value::$variant(ref mut v) => Some(v),
                    _ => None,
                }
            }
        }
    };
    ($t:ty, $variant:ident, multiple) => {
        impl_field_value!($crate::feed::Multiple<$t>, $variant);

        impl $crate::feed::CollectionValue for $crate::feed::Multiple<$t> {
            fn coerce(value: &mut $crate::feed::Value) -> &mut Self {
                if !matches!(*value, $crate::feed::Value::$variant(_)) {
                    *value = $crate::feed::Value::$variant(Default::default());
                }
                match *value {
                    $crate::feed::Value::$variant(ref mut v) => v,
                    _ => unreachable!(),
                }
            }
        }
    };
}
