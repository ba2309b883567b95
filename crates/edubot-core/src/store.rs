use crate::events::EventRepository;
use crate::tramites::TramiteRepository;

pub trait Store {
    type Events<'a>: EventRepository
    where
        Self: 'a;
    type Tramites<'a>: TramiteRepository
    where
        Self: 'a;

    fn events(&self) -> Self::Events<'_>;
    fn tramites(&self) -> Self::Tramites<'_>;
}
